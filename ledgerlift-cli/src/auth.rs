use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::state::ensure_ledgerlift_home;

/// Environment variables checked for the service key, in order.
pub const KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AuthState {
    pub gemini_api_key: Option<String>,
}

fn auth_path() -> Result<PathBuf> {
    Ok(ensure_ledgerlift_home()?.join("auth.json"))
}

pub fn load_auth_from(p: &Path) -> Result<AuthState> {
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_auth_to(auth: &AuthState, p: &Path) -> Result<()> {
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// First non-blank key from the environment, then the stored one.
fn pick_key(env: impl Fn(&str) -> Option<String>, stored: Option<String>) -> Option<String> {
    KEY_ENV_VARS
        .iter()
        .filter_map(|var| env(*var))
        .chain(stored)
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
}

/// Resolve the key for this run. `None` is not an error here: each
/// extraction call reports the missing key as that file's failure.
pub fn resolve_api_key() -> Result<Option<String>> {
    let stored = load_auth_from(&auth_path()?)?.gemini_api_key;
    Ok(pick_key(|v| std::env::var(v).ok(), stored))
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn paste_api_key() -> Result<()> {
    let p = auth_path()?;
    let mut auth = load_auth_from(&p)?;
    let key = prompt_secret("Paste Gemini API key")?;
    if key.is_empty() {
        bail!("no key entered");
    }
    if key.chars().any(char::is_whitespace) {
        bail!("key contains whitespace; paste the key only");
    }
    auth.gemini_api_key = Some(key);
    save_auth_to(&auth, &p)?;
    println!("Saved Gemini API key to {}", p.display());
    Ok(())
}

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$LEDGERLIFT_HOME`, else `~/.ledgerlift`
pub fn ledgerlift_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("LEDGERLIFT_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".ledgerlift"))
}

pub fn ensure_ledgerlift_home() -> Result<PathBuf> {
    let dir = ledgerlift_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

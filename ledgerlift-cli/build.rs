use std::env;
use std::process::Command;

const SHA_VAR: &str = "LEDGERLIFT_BUILD_SHA";

fn git_short_sha() -> Option<String> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").ok()?;
    let out = Command::new("git")
        .args(["-C", &manifest_dir, "rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;
    Some(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

fn main() {
    // Source tarballs have no git; packagers pass the revision in instead.
    println!("cargo:rerun-if-env-changed={SHA_VAR}");

    let sha = env::var(SHA_VAR)
        .ok()
        .or_else(git_short_sha)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={SHA_VAR}={sha}");
}

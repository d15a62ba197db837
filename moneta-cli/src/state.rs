use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn moneta_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".moneta"))
}

pub fn ensure_moneta_home() -> Result<PathBuf> {
    let dir = moneta_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Where the bearer token for the current session lives.
pub fn auth_path() -> Result<PathBuf> {
    Ok(ensure_moneta_home()?.join("auth.json"))
}

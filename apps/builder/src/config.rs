use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::storage::autosave::DEFAULT_DEBOUNCE;
use crate::storage::DEFAULT_QUOTA_BYTES;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub data_dir: PathBuf,
    pub autosave_debounce: Duration,
    pub storage_quota_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            autosave_debounce: parse_env("AUTOSAVE_DEBOUNCE_MS", DEFAULT_DEBOUNCE.as_millis() as u64)
                .map(Duration::from_millis)
                .context("AUTOSAVE_DEBOUNCE_MS must be a whole number of milliseconds")?,
            storage_quota_bytes: parse_env("STORAGE_QUOTA_BYTES", DEFAULT_QUOTA_BYTES)
                .context("STORAGE_QUOTA_BYTES must be a whole number of bytes")?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value {raw:?} for '{key}'")),
        Err(_) => Ok(default),
    }
}

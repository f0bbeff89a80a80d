use std::{env, path::PathBuf};

use anyhow::Context;

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_STORE_DIR: &str = "data";
pub const DEFAULT_STORE_KEY: &str = "army_courses";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// credential for the generation service; generation is unavailable without it
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    /// directory holding the saved course collection
    pub store_dir: PathBuf,
    pub store_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            store_key: DEFAULT_STORE_KEY.to_string(),
        }
    }
}

impl Config {
    /// Reads `ADDIE_*` variables, loading a `.env` file first if one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match var("ADDIE_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context(format!("ADDIE_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw))?,
            None => defaults.timeout_secs,
        };

        Ok(Self {
            api_key: var("ADDIE_API_KEY"),
            model: var("ADDIE_MODEL").unwrap_or(defaults.model),
            endpoint: var("ADDIE_ENDPOINT").unwrap_or(defaults.endpoint),
            timeout_secs,
            store_dir: var("ADDIE_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
            store_key: var("ADDIE_STORE_KEY").unwrap_or(defaults.store_key),
        })
    }

    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        self.api_key
            .as_deref()
            .context("ADDIE_API_KEY is not set, generation requires a service key")
    }
}

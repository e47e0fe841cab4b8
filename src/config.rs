use std::path::Path;

use serde::Deserialize;

use crate::{Result, SteamError};

pub const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";

pub const API_KEY_VAR: &str = "STEAM_API_KEY";
pub const BASE_URL_VAR: &str = "STEAM_API_URL";
pub const CACHE_VAR: &str = "STEAMSIG_CACHE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_cache_usage")]
    pub cache_usage: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_cache_usage() -> bool {
    true
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            cache_usage: default_cache_usage(),
        }
    }

    /// Reads the configuration from `STEAM_API_KEY`, `STEAM_API_URL`
    /// and `STEAMSIG_CACHE`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SteamError::InvalidInput(format!(
                "could not read {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| {
            SteamError::InvalidInput(format!(
                "could not parse {}: {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_VAR).ok_or_else(|| {
            SteamError::InvalidInput(format!("{} is not set", API_KEY_VAR))
        })?;
        let mut config = Config::new(api_key);
        if let Some(base_url) = lookup(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        if let Some(flag) = lookup(CACHE_VAR) {
            let flag = flag.trim().to_ascii_lowercase();
            config.cache_usage = !matches!(flag.as_str(), "0" | "false" | "off");
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(SteamError::InvalidInput("empty API key".to_owned()));
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            SteamError::InvalidInput(format!(
                "invalid base URL {}: {}",
                self.base_url, e
            ))
        })?;
        Ok(())
    }
}

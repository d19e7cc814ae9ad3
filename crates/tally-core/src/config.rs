//! TOML-based application configuration.
//!
//! Stores:
//! - Rate-lookup settings (service base URL, cache TTL)
//! - The subject recorded while nobody is signed in
//!
//! Configuration is stored at `~/.config/tally/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Rate-lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Base URL of the rate service.
    #[serde(default = "default_rates_base_url")]
    pub base_url: String,
    /// Minutes a cached rate stays fresh.
    #[serde(default = "default_rates_ttl_minutes")]
    pub ttl_minutes: i64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tally/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rates: RatesConfig,
    /// Subject recorded when no user is signed in.
    #[serde(default = "default_subject")]
    pub default_subject: String,
}

// Default functions
fn default_rates_base_url() -> String {
    "https://api.tally.app".into()
}
fn default_rates_ttl_minutes() -> i64 {
    10
}
fn default_subject() -> String {
    "guest".into()
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            base_url: default_rates_base_url(),
            ttl_minutes: default_rates_ttl_minutes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rates: RatesConfig::default(),
            default_subject: default_subject(),
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults when the file is
    /// absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Persist the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}

fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("config.toml"))
}

/// Returns `~/.config/tally[-dev]/` based on TALLY_ENV.
///
/// Set TALLY_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TALLY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tally-dev")
    } else {
        base_dir.join("tally")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDirFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

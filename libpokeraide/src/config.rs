//! Configuration management for PokerAide

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request path is joined onto
    pub base_url: String,
    /// Per-request timeout; no timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub sequencing: SequencingPolicy,
}

/// How completions of overlapping requests on the same resource are applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencingPolicy {
    /// Apply a response only if no later-issued request on the same
    /// resource has been applied already
    #[default]
    LatestIssued,
    /// Apply every response in completion order
    Unordered,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file yields the defaults; `POKERAIDE_API_URL` overrides the
    /// base URL either way.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            Self::default()
        };

        if let Ok(url) = std::env::var("POKERAIDE_API_URL") {
            config.api.base_url = url;
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }
}

/// Resolve the configuration file path following XDG Base Directory layout
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("POKERAIDE_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("pokeraide").join("config.toml"))
}

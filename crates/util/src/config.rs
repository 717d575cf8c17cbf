//! Provider configuration file.
//!
//! The file lives at `~/.config/docsource/config.json` by default and can be
//! relocated with `DOCSOURCE_CONFIG_PATH`. A missing file means defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::expand_tilde;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "DOCSOURCE_CONFIG_PATH";

pub const DEFAULT_PROVIDER_TYPE: &str = "docsource";

static PROVIDER_TYPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("provider type regex should compile"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

/// Settings shared by the provider and its store connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProviderConfig {
    /// Prefix for data source type names (`<provider_type>_firestore_document`).
    #[serde(default = "default_provider_type")]
    pub provider_type: String,
    /// Store endpoint override; takes precedence over `FIRESTORE_EMULATOR_HOST`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// User-Agent sent with store requests.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_provider_type() -> String {
    DEFAULT_PROVIDER_TYPE.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            base_url: None,
            user_agent: None,
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !PROVIDER_TYPE_REGEX.is_match(&self.provider_type) {
            return Err(ConfigError::Invalid {
                field: "providerType".into(),
                reason: format!(
                    "'{}' must start with a lowercase letter and contain only lowercase letters, digits and underscores",
                    self.provider_type
                ),
            });
        }
        if let Some(base_url) = &self.base_url {
            Url::parse(base_url).map_err(|error| ConfigError::Invalid {
                field: "baseUrl".into(),
                reason: format!("'{base_url}' is not a valid URL: {error}"),
            })?;
        }
        Ok(())
    }
}

/// Returns the path the configuration is read from.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docsource")
        .join("config.json")
}

/// Loads configuration from the default path.
pub fn load_config() -> Result<ProviderConfig, ConfigError> {
    load_config_from_path(&default_config_path())
}

/// Loads configuration from `path`, falling back to defaults when it does not exist.
pub fn load_config_from_path(path: &Path) -> Result<ProviderConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no provider config file; using defaults");
        return Ok(ProviderConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ProviderConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    debug!(path = %path.display(), provider_type = %config.provider_type, "loaded provider config");
    Ok(config)
}

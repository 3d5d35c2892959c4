//! Global Configuration (~/.trial/config.toml)
//!
//! Handles user-level defaults stored in `~/.trial/config.toml`.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.trial/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Reporter used by compiled suites ("console" or "json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,

    /// Colored output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(reporter) = self.defaults.as_ref().and_then(|d| d.reporter.as_deref()) {
            if !matches!(reporter, "console" | "json") {
                return Err(ConfigError::InvalidValue {
                    field: "defaults.reporter".to_string(),
                    reason: format!("must be 'console' or 'json', got '{}'", reporter),
                });
            }
        }
        Ok(())
    }

    /// Get the global config file path (~/.trial/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".trial").join("config.toml"))
    }

    pub fn default_reporter(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.reporter.as_deref())
    }

    /// Whether color is enabled (default: true)
    pub fn color(&self) -> bool {
        self.defaults.as_ref().and_then(|d| d.color).unwrap_or(true)
    }
}

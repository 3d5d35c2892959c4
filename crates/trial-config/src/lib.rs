//! Trial Configuration System
//!
//! Configuration for the `trial` command:
//! - Project configuration (trial.toml)
//! - Global user configuration (~/.trial/config.toml)
//! - `{placeholder}` expansion for compiler and runtime arguments
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Global config (~/.trial/config.toml)
//! 2. Project config (trial.toml, found by walking up from the start directory)
//! 3. Environment variables (TRIAL_COMPILER, TRIAL_RUNTIME, TRIAL_OUT_DIR)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use trial_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("compiling with {}", config.project.compiler_command());
//! ```

pub mod global;
pub mod loader;
pub mod placeholder;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown placeholder '{{{name}}}' in {field}")]
    UnknownPlaceholder { field: String, name: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use global::GlobalConfig;
pub use loader::{Config, ConfigLoader};
pub use placeholder::Placeholders;
pub use project::ProjectConfig;

/// Project config file name
pub const PROJECT_CONFIG_FILE: &str = "trial.toml";

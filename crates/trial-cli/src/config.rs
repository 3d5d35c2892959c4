//! CLI configuration via environment variables
//!
//! Settings that only affect how `trial` itself prints. Project settings
//! live in trial.toml (see `trial_config`).

use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Disable colored output (TRIAL_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Reporter forced for the spawned suite (TRIAL_REPORTER=console|json)
    pub reporter: Option<String>,
    /// Verbose output by default (TRIAL_VERBOSE=1)
    pub verbose: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            no_color: env::var("TRIAL_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok(),
            reporter: env::var("TRIAL_REPORTER")
                .ok()
                .map(|v| v.to_lowercase())
                .filter(|v| v == "json" || v == "console"),
            verbose: flag_enabled("TRIAL_VERBOSE"),
        }
    }
}

/// Read a boolean flag the way spawned suites read it.
///
/// Unset, empty, `0`, `false`, `off` and `no` are off; anything else is on.
fn flag_enabled(name: &str) -> bool {
    match env::var(name) {
        Ok(value) => !matches!(
            value.trim().to_lowercase().as_str(),
            "" | "0" | "false" | "off" | "no"
        ),
        Err(_) => false,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

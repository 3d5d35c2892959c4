//! Configuration Loader
//!
//! Loads the global and project layers and applies environment overrides.

use crate::global::GlobalConfig;
use crate::project::{CompilerConfig, PathsConfig, ProjectConfig, RuntimeConfig};
use crate::{ConfigError, ConfigResult, PROJECT_CONFIG_FILE};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader
///
/// Loads configuration layers in order of precedence:
/// 1. Global config (~/.trial/config.toml) - lowest priority
/// 2. Project config (./trial.toml) - overrides global
/// 3. Environment variables (TRIAL_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Loaded configuration layers
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Global configuration
    pub global: GlobalConfig,

    /// Project root directory (where trial.toml was found)
    pub project_root: Option<PathBuf>,

    /// Directory relative paths resolve against
    pub base_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Read global config from `path` instead of ~/.trial/config.toml
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find trial.toml, then loads the
    /// global config if it exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        let global_config = self.load_global_config()?;
        let project_config = apply_env_overrides(project_config);

        let base_dir = project_root
            .clone()
            .unwrap_or_else(|| start_dir.to_path_buf());

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
            base_dir,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let global_config = self.load_global_config()?;
        let project_config = apply_env_overrides(project_config);

        let project_root = config_path.parent().map(|p| p.to_path_buf());
        let base_dir = project_root.clone().unwrap_or_default();

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
            base_dir,
        })
    }

    /// Find project configuration by walking up directory tree
    ///
    /// Returns (project_root, project_config), or the default config with no
    /// root when no trial.toml exists.
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading project config");
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Load global configuration, or the default when the file is absent
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => match GlobalConfig::global_config_path() {
                Ok(path) => {
                    self.global_config_path = Some(path.clone());
                    path
                }
                Err(ConfigError::HomeNotFound) => {
                    tracing::debug!("no home directory; skipping global config");
                    return Ok(GlobalConfig::default());
                }
                Err(err) => return Err(err),
            },
        };

        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        GlobalConfig::load_from_file(&path)
    }

    /// Get the global configuration directory (~/.trial)
    pub fn global_config_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".trial"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply TRIAL_COMPILER, TRIAL_RUNTIME and TRIAL_OUT_DIR
fn apply_env_overrides(mut config: ProjectConfig) -> ProjectConfig {
    if let Some(command) = non_empty_var("TRIAL_COMPILER") {
        config
            .compiler
            .get_or_insert_with(CompilerConfig::default)
            .command = Some(command);
    }

    if let Some(command) = non_empty_var("TRIAL_RUNTIME") {
        config
            .runtime
            .get_or_insert_with(RuntimeConfig::default)
            .command = Some(command);
    }

    if let Some(out_dir) = non_empty_var("TRIAL_OUT_DIR") {
        config.paths.get_or_insert_with(PathsConfig::default).output = Some(PathBuf::from(out_dir));
    }

    config
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if this is a project (has trial.toml)
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Source directory resolved against the project root
    pub fn source_dir(&self) -> PathBuf {
        self.base_dir.join(self.project.source_dir())
    }

    /// Output directory resolved against the project root
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(self.project.output_dir())
    }

    /// Compiler configuration file resolved against the project root
    pub fn compiler_config(&self) -> PathBuf {
        self.base_dir.join(self.project.compiler_config())
    }

    /// Reporter from the global defaults (default: "console")
    pub fn reporter(&self) -> &str {
        self.global.default_reporter().unwrap_or("console")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        fs::write(&config_path, content).unwrap();
        config_path
    }

    fn loader(temp_dir: &TempDir) -> ConfigLoader {
        ConfigLoader::with_global_config_path(temp_dir.path().join("missing-global.toml"))
    }

    #[test]
    fn test_find_config_in_parent() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(temp_dir.path(), "[runtime]\ncommand = \"deno\"\n");

        let sub_dir = temp_dir.path().join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        let config = loader(&temp_dir).load_from_directory(&sub_dir).unwrap();

        assert_eq!(config.project.runtime_command(), "deno");
        assert_eq!(config.project_root(), Some(temp_dir.path()));
        assert_eq!(config.source_dir(), temp_dir.path().join("src"));
    }

    #[test]
    fn test_no_project_config_uses_start_dir() {
        let temp_dir = TempDir::new().unwrap();

        let config = loader(&temp_dir)
            .load_from_directory(temp_dir.path())
            .unwrap();

        assert!(!config.is_project());
        assert_eq!(config.output_dir(), temp_dir.path().join("dist"));
        assert_eq!(config.reporter(), "console");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            "[compiler]\ncommand = \"tsc\"\n\n[paths]\noutput = \"dist\"\n",
        );

        env::set_var("TRIAL_COMPILER", "swc");
        env::set_var("TRIAL_OUT_DIR", "out");

        let config = loader(&temp_dir)
            .load_from_directory(temp_dir.path())
            .unwrap();

        env::remove_var("TRIAL_COMPILER");
        env::remove_var("TRIAL_OUT_DIR");

        assert_eq!(config.project.compiler_command(), "swc");
        assert_eq!(config.output_dir(), temp_dir.path().join("out"));
    }

    #[test]
    #[serial]
    fn test_blank_env_ignored() {
        let temp_dir = TempDir::new().unwrap();
        env::set_var("TRIAL_RUNTIME", "  ");

        let config = loader(&temp_dir)
            .load_from_directory(temp_dir.path())
            .unwrap();

        env::remove_var("TRIAL_RUNTIME");
        assert_eq!(config.project.runtime_command(), "node");
    }
}

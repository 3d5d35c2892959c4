//! Project Configuration (trial.toml)
//!
//! Describes how a test specification is compiled and how the compiled
//! output is run.

use crate::placeholder;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_COMPILER: &str = "tsc";
pub const DEFAULT_COMPILER_CONFIG: &str = "tsconfig.json";
pub const DEFAULT_RUNTIME: &str = "node";
pub const DEFAULT_SOURCE_DIR: &str = "src";
pub const DEFAULT_OUTPUT_DIR: &str = "dist";
pub const DEFAULT_OUTPUT_EXTENSION: &str = "js";

/// Project configuration from trial.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// How test specifications are compiled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler: Option<CompilerConfig>,

    /// How compiled output is executed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeConfig>,

    /// Where sources and compiled output live
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsConfig>,
}

/// Compiler configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    /// Compiler executable (default: "tsc")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments, with `{placeholder}` expansion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Compiler configuration file (default: "tsconfig.json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Executable that runs the compiled output (default: "node")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments, with `{placeholder}` expansion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

/// Source and output locations, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Source directory searched for test specifications (default: "src")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Compiler output directory (default: "dist")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Extension of compiled files (default: "js")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl ProjectConfig {
    /// Load project configuration from a file
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

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(compiler) = &self.compiler {
            validate_command("compiler.command", compiler.command.as_deref())?;
            for arg in &compiler.args {
                placeholder::check("compiler.args", arg)?;
            }
        }

        if let Some(runtime) = &self.runtime {
            validate_command("runtime.command", runtime.command.as_deref())?;
            for arg in &runtime.args {
                placeholder::check("runtime.args", arg)?;
            }
        }

        if let Some(paths) = &self.paths {
            validate_relative("paths.source", paths.source.as_deref())?;
            validate_relative("paths.output", paths.output.as_deref())?;
            if let Some(extension) = &paths.extension {
                if extension.is_empty() || extension.starts_with('.') {
                    return Err(ConfigError::InvalidValue {
                        field: "paths.extension".to_string(),
                        reason: format!("expected an extension without a dot, got '{}'", extension),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn compiler_command(&self) -> &str {
        self.compiler
            .as_ref()
            .and_then(|c| c.command.as_deref())
            .unwrap_or(DEFAULT_COMPILER)
    }

    /// Compiler arguments; defaults to `-p {config} --outDir {out_dir}`
    pub fn compiler_args(&self) -> Vec<String> {
        match &self.compiler {
            Some(compiler) if !compiler.args.is_empty() => compiler.args.clone(),
            _ => vec![
                "-p".to_string(),
                "{config}".to_string(),
                "--outDir".to_string(),
                "{out_dir}".to_string(),
            ],
        }
    }

    pub fn compiler_config(&self) -> &Path {
        self.compiler
            .as_ref()
            .and_then(|c| c.config.as_deref())
            .unwrap_or(Path::new(DEFAULT_COMPILER_CONFIG))
    }

    pub fn runtime_command(&self) -> &str {
        self.runtime
            .as_ref()
            .and_then(|r| r.command.as_deref())
            .unwrap_or(DEFAULT_RUNTIME)
    }

    /// Runtime arguments; defaults to `{output}`
    pub fn runtime_args(&self) -> Vec<String> {
        match &self.runtime {
            Some(runtime) if !runtime.args.is_empty() => runtime.args.clone(),
            _ => vec!["{output}".to_string()],
        }
    }

    pub fn source_dir(&self) -> &Path {
        self.paths
            .as_ref()
            .and_then(|p| p.source.as_deref())
            .unwrap_or(Path::new(DEFAULT_SOURCE_DIR))
    }

    pub fn output_dir(&self) -> &Path {
        self.paths
            .as_ref()
            .and_then(|p| p.output.as_deref())
            .unwrap_or(Path::new(DEFAULT_OUTPUT_DIR))
    }

    pub fn output_extension(&self) -> &str {
        self.paths
            .as_ref()
            .and_then(|p| p.extension.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_EXTENSION)
    }

    /// The file `trial init` writes
    pub fn template() -> Self {
        Self {
            compiler: Some(CompilerConfig {
                command: Some(DEFAULT_COMPILER.to_string()),
                args: Vec::new(),
                config: Some(PathBuf::from(DEFAULT_COMPILER_CONFIG)),
            }),
            runtime: Some(RuntimeConfig {
                command: Some(DEFAULT_RUNTIME.to_string()),
                args: Vec::new(),
            }),
            paths: Some(PathsConfig {
                source: Some(PathBuf::from(DEFAULT_SOURCE_DIR)),
                output: Some(PathBuf::from(DEFAULT_OUTPUT_DIR)),
                extension: Some(DEFAULT_OUTPUT_EXTENSION.to_string()),
            }),
        }
    }
}

fn validate_command(field: &str, command: Option<&str>) -> ConfigResult<()> {
    match command {
        Some(command) if command.trim().is_empty() => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "command cannot be empty".to_string(),
        }),
        _ => Ok(()),
    }
}

// Paths are resolved against the project root, so absolute ones are rejected
fn validate_relative(field: &str, path: Option<&Path>) -> ConfigResult<()> {
    match path {
        Some(path) if path.is_absolute() => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' must be relative to the project root", path.display()),
        }),
        Some(path) if path.as_os_str().is_empty() => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "path cannot be empty".to_string(),
        }),
        _ => Ok(()),
    }
}

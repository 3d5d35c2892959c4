//! Project initialization command (trial init)

use anyhow::{bail, Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use trial_config::{ProjectConfig, PROJECT_CONFIG_FILE};

/// Arguments for the init command
#[derive(Debug, Clone)]
pub struct InitArgs {
    /// Directory to write trial.toml into
    pub path: PathBuf,
    /// Overwrite an existing trial.toml
    pub force: bool,
    /// Verbose output
    pub verbose: bool,
}

impl Default for InitArgs {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            force: false,
            verbose: false,
        }
    }
}

/// Run the init command
pub fn run(args: InitArgs) -> Result<()> {
    let config_path = args.path.join(PROJECT_CONFIG_FILE);
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists at {} (use --force to overwrite)",
            PROJECT_CONFIG_FILE,
            config_path.display()
        );
    }

    fs::create_dir_all(&args.path).context("Failed to create project directory")?;
    fs::write(&config_path, generate_config()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    if args.verbose {
        println!("  Created {}", config_path.display());
    }

    let source_dir = args.path.join(ProjectConfig::template().source_dir());
    if !source_dir.exists() {
        fs::create_dir_all(&source_dir).context("Failed to create source directory")?;
        if args.verbose {
            println!("  Created {}", source_dir.display());
        }
    }

    println!(
        "{} Created {} in {}",
        "✓".green().bold(),
        PROJECT_CONFIG_FILE,
        display_dir(&args.path)
    );
    println!("\nTo get started:");
    println!("  trial test <file>.test.ts");

    Ok(())
}

fn generate_config() -> Result<String> {
    let body = toml::to_string_pretty(&ProjectConfig::template())
        .context("Failed to serialize default configuration")?;
    Ok(format!(
        "# trial configuration\n\
         # Arguments accept {{source}}, {{output}}, {{config}} and {{out_dir}}.\n\n{}",
        body
    ))
}

fn display_dir(path: &Path) -> String {
    match path.to_str() {
        Some(".") | Some("") => "the current directory".to_string(),
        _ => path.display().to_string(),
    }
}

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod locate;
mod process;

/// Compile a test specification and run it.
///
/// trial compiles a single test file with an external compiler, then runs
/// the compiled output and streams its report back to the terminal.
///
/// EXAMPLES:
///     trial test math.test.ts          Compile and run a test file
///     trial test math.test.ts --json   Ask the suite for a JSON report
///     trial test math.test.ts --dry-run
///     trial init                       Write a default trial.toml
///
/// ENVIRONMENT VARIABLES:
///     TRIAL_COMPILER    Override [compiler] command
///     TRIAL_RUNTIME     Override [runtime] command
///     TRIAL_OUT_DIR     Override [paths] output
///     TRIAL_JSON        Set to '1' for JSON reports by default
///     NO_COLOR          Set to disable colored output
///     RUST_LOG          Log filter (default: warn)
#[derive(Parser)]
#[command(name = "trial")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and run a test specification
    ///
    /// Looks the file up directly or under the configured source directory,
    /// compiles it, then runs the compiled output. Exits with the suite's
    /// exit code.
    ///
    /// EXAMPLES:
    ///     trial test src/math.test.ts
    ///     trial test math.test.ts --compiler-config tsconfig.test.json
    ///     trial t math.test.ts --verbose
    #[command(visible_alias = "t")]
    Test {
        /// Test specification file
        file: String,
        /// Path to trial.toml (default: search upwards)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Compiler configuration file
        #[arg(long)]
        compiler_config: Option<PathBuf>,
        /// Ask the suite for a JSON report
        #[arg(long, env = "TRIAL_JSON")]
        json: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
        /// Verbose output with per-test timing
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Print the resolved commands without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Write a default trial.toml
    ///
    /// EXAMPLES:
    ///     trial init
    ///     trial init --force      Overwrite an existing trial.toml
    Init {
        /// Overwrite an existing trial.toml
        #[arg(long)]
        force: bool,
        /// Verbose output
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     trial completions bash > ~/.bash_completions/trial.bash
    ///     trial completions zsh > ~/.zfunc/_trial
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();
    let cli_config = config::Config::from_env();

    match cli.command {
        Commands::Test {
            file,
            config,
            compiler_config,
            json,
            no_color,
            verbose,
            dry_run,
        } => {
            let args = commands::test::TestArgs {
                file,
                config,
                compiler_config,
                json: json || cli_config.reporter.as_deref() == Some("json"),
                no_color: no_color || cli_config.no_color,
                verbose: verbose || cli_config.verbose,
                dry_run,
                cwd: std::env::current_dir()?,
            };
            let code = commands::test::run(args)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Init { force, verbose } => {
            let args = commands::init::InitArgs {
                path: std::env::current_dir()?,
                force,
                verbose,
            };
            commands::init::run(args)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}

//! Command-line interface for markguard
//!
//! Invoked with no subcommand, markguard runs `check`: this is what the
//! installed pre-commit hook and external hook runners call.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

pub mod commands;
mod output;

pub use output::Output;

/// Exit status for a clean check or a passing pipeline
pub const EXIT_CLEAN: u8 = 0;
/// Exit status when the commit must be aborted
pub const EXIT_BLOCKED: u8 = 1;
/// Exit status when the check could not run at all
pub const EXIT_ERROR: u8 = 2;

/// markguard - block commits that still contain a forbidden marker
#[derive(Parser)]
#[command(name = "markguard", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Run as if started in <DIR> instead of the current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, value_name = "FILE", global = true, env = "MARKGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check staged changes for the forbidden marker (default)
    Check(commands::check::CheckArgs),
    /// Run the configured local hooks over the staged files
    Run(commands::run::RunArgs),
    /// Install the pre-commit hook into the current repository
    Install(commands::install::InstallArgs),
    /// Remove the pre-commit hook installed by markguard
    Uninstall,
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a starter markguard.yaml
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the merged configuration
    Show {
        /// Output format (yaml, json, toml)
        #[arg(long, default_value = "yaml")]
        format: String,
    },
    /// Validate the merged configuration
    Validate,
}

impl Cli {
    /// Execute the CLI command and return the process exit status
    pub async fn run(self) -> Result<ExitCode> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.quiet);
        let config = self.config.as_deref();

        match self.command {
            None => {
                let args = commands::check::CheckArgs::default();
                commands::check::execute(args, config, &output).await
            }
            Some(Commands::Check(args)) => commands::check::execute(args, config, &output).await,
            Some(Commands::Run(args)) => commands::run::execute(args, config, &output).await,
            Some(Commands::Install(args)) => commands::install::execute(args, &output).await,
            Some(Commands::Uninstall) => commands::install::uninstall(&output).await,
            Some(Commands::Config(cmd)) => commands::config::execute(cmd, config, &output).await,
            Some(Commands::Version) => commands::version::execute(&output).await,
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Logs share stderr with diagnostics; stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .without_time()
        .try_init();
}

//! Forbidden marker check
//!
//! Reads the staged changes (from git, or a unified diff on stdin) and exits
//! non-zero when any added line contains the marker.

use crate::cli::{EXIT_BLOCKED, EXIT_CLEAN, Output};
use crate::config::MarkguardConfig;
use crate::error::GuardError;
use crate::git::GitRepo;
use crate::guard::{GuardResult, Marker, MarkerGuard, ScanMode, StagedChangeSet, parse_unified_diff};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tracing::info;

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Read a unified diff (`git diff --cached -U0`) from stdin instead of querying git
    #[arg(long)]
    pub stdin: bool,

    /// Forbidden marker, overriding the configuration
    #[arg(long, env = "MARKGUARD_MARKER")]
    pub marker: Option<String>,

    /// Stop at the first offending line
    #[arg(long)]
    pub first_match: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = CheckFormat::Text)]
    pub format: CheckFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CheckFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    marker: &'a str,
    scanned_lines: usize,
    #[serde(flatten)]
    result: &'a GuardResult,
}

pub async fn execute(
    args: CheckArgs,
    config_path: Option<&Path>,
    output: &Output,
) -> Result<ExitCode> {
    let config = MarkguardConfig::load(config_path).context("failed to load configuration")?;

    let marker = match args.marker {
        Some(token) => Marker::new(token)?,
        None => config.marker()?,
    };
    let mode = if args.first_match {
        ScanMode::FirstMatch
    } else {
        config.scan_mode()
    };

    let changes = if args.stdin {
        read_stdin_diff().await?
    } else {
        GitRepo::discover(".")?.staged_changes()?
    };

    let guard = MarkerGuard::new(marker).with_mode(mode);
    let result = guard.check(&changes);
    info!(blocked = result.is_blocked(), lines = changes.len(), "check complete");

    match args.format {
        CheckFormat::Json => {
            let report = CheckReport {
                marker: guard.marker().as_str(),
                scanned_lines: changes.len(),
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        CheckFormat::Text => print_text(&guard, &changes, &result, output),
    }

    let code = if result.is_blocked() { EXIT_BLOCKED } else { EXIT_CLEAN };
    Ok(ExitCode::from(code))
}

async fn read_stdin_diff() -> Result<StagedChangeSet, GuardError> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map_err(|e| GuardError::input_unavailable("failed to read diff from stdin", e))?;
    Ok(parse_unified_diff(&text))
}

fn print_text(
    guard: &MarkerGuard,
    changes: &StagedChangeSet,
    result: &GuardResult,
    output: &Output,
) {
    let marker = guard.marker();
    match result {
        GuardResult::Clean => {
            if changes.is_empty() {
                output.success("No staged changes to check");
            } else {
                output.success(&format!(
                    "No '{marker}' found in {} staged lines",
                    changes.len()
                ));
            }
        }
        GuardResult::Blocked { offenders } => {
            output.error(&format!("Forbidden marker '{marker}' found in staged changes:"));
            for line in offenders {
                output.offender(line);
            }
            if guard.mode() == ScanMode::FirstMatch {
                output.detail("(stopped at the first match)");
            }
            output.detail("Remove the marker, re-stage the file and commit again.");
        }
    }
}

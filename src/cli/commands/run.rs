//! Run the configured hook pipeline over the staged files

use crate::cli::{EXIT_BLOCKED, EXIT_CLEAN, Output};
use crate::config::MarkguardConfig;
use crate::git::GitRepo;
use crate::hooks::{HookContext, HookExecutor, HookStatus};
use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;
use std::process::ExitCode;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Stop at the first failing hook
    #[arg(long)]
    pub fail_fast: bool,
}

pub async fn execute(
    args: RunArgs,
    config_path: Option<&Path>,
    output: &Output,
) -> Result<ExitCode> {
    let mut config = MarkguardConfig::load(config_path).context("failed to load configuration")?;
    if args.fail_fast {
        config.hooks.fail_fast = true;
    }

    let executor = HookExecutor::new(&config)?;
    if executor.is_empty() {
        output.info("No hooks configured");
        return Ok(ExitCode::from(EXIT_CLEAN));
    }

    let repo = GitRepo::discover(".")?;
    let workdir = repo.workdir()?.to_path_buf();
    let files = repo.staged_files()?;
    let changes = repo.staged_changes()?;

    let ctx = HookContext {
        workdir: &workdir,
        files: &files,
        changes: &changes,
    };
    let report = executor.run(&ctx)?;

    for hook in &report.hooks {
        output.hook_result(hook);
    }
    if report.stopped_early {
        output.warning("Stopped after the first failing hook (fail_fast)");
    }

    if report.success() {
        Ok(ExitCode::from(EXIT_CLEAN))
    } else {
        output.error(&format!(
            "{} of {} hooks failed, commit aborted",
            report.count(HookStatus::Failed),
            executor.len()
        ));
        Ok(ExitCode::from(EXIT_BLOCKED))
    }
}

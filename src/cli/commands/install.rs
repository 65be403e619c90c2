//! Install and remove the pre-commit hook

use crate::cli::{EXIT_CLEAN, Output};
use crate::git::{GitRepo, pre_commit_script};
use anyhow::{Result, bail};
use clap::Args;
use std::process::ExitCode;

const HOOK_NAME: &str = "pre-commit";

#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Overwrite an existing pre-commit hook not written by markguard
    #[arg(short, long)]
    pub force: bool,
}

pub async fn execute(args: InstallArgs, output: &Output) -> Result<ExitCode> {
    let repo = GitRepo::discover(".")?;

    if repo.hook_exists(HOOK_NAME) && !repo.hook_is_ours(HOOK_NAME)? {
        if !args.force {
            bail!("a {HOOK_NAME} hook already exists; rerun with --force to replace it");
        }
        output.warning(&format!("Replacing existing {HOOK_NAME} hook"));
    }

    let path = repo.install_hook(HOOK_NAME, &pre_commit_script())?;
    output.success(&format!("Installed {HOOK_NAME} hook"));
    output.key_value("Path", &path.display().to_string());

    Ok(ExitCode::from(EXIT_CLEAN))
}

pub async fn uninstall(output: &Output) -> Result<ExitCode> {
    let repo = GitRepo::discover(".")?;

    if !repo.hook_exists(HOOK_NAME) {
        output.info(&format!("No {HOOK_NAME} hook installed"));
    } else if !repo.hook_is_ours(HOOK_NAME)? {
        output.warning(&format!(
            "The {HOOK_NAME} hook was not installed by markguard; leaving it in place"
        ));
    } else {
        repo.remove_hook(HOOK_NAME)?;
        output.success(&format!("Removed {HOOK_NAME} hook"));
    }

    Ok(ExitCode::from(EXIT_CLEAN))
}

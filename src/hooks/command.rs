//! Command-backed hooks
//!
//! Runs a locally available program over the staged files. The program is
//! opaque: markguard only looks at its exit status and at which files
//! changed on disk while it ran.

use super::{FileFilter, Hook, HookContext, HookOutcome, HookStatus};
use crate::config::HookEntry;
use crate::error::{GuardError, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

pub struct CommandHook {
    id: String,
    entry: String,
    args: Vec<String>,
    filter: FileFilter,
    pass_filenames: bool,
}

impl CommandHook {
    pub fn from_entry(hook: &HookEntry) -> Result<Self> {
        let entry = hook.entry.clone().ok_or_else(|| GuardError::Hook {
            id: hook.id.clone(),
            reason: "no `entry` configured".to_string(),
        })?;

        Ok(Self {
            id: hook.id.clone(),
            entry,
            args: hook.args.clone(),
            filter: FileFilter::from_entry(hook)?,
            pass_filenames: hook.pass_filenames,
        })
    }

    /// The program name, when `entry` starts with a plain executable name
    fn program(&self) -> Option<&str> {
        let first = self.entry.split_whitespace().next()?;
        first
            .chars()
            .all(|c| c.is_alphanumeric() || "-_./".contains(c))
            .then_some(first)
    }
}

impl Hook for CommandHook {
    fn id(&self) -> &str {
        &self.id
    }

    fn run(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
        let files = self.filter.apply(ctx.workdir, ctx.files);
        if self.pass_filenames && files.is_empty() {
            return Ok(HookOutcome::skipped("no files to check"));
        }

        if let Some(program) = self.program() {
            if !program.contains('/') && which::which(program).is_err() {
                return Ok(HookOutcome::failed(vec![format!(
                    "'{program}' not found on PATH"
                )]));
            }
        }

        let before = fingerprint(ctx.workdir, &files);

        // `"$@"` keeps args and file names out of shell word splitting
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(format!("{} \"$@\"", self.entry))
            .arg(&self.id)
            .args(&self.args)
            .current_dir(ctx.workdir);
        if self.pass_filenames {
            cmd.args(&files);
        }

        debug!(hook = %self.id, entry = %self.entry, files = files.len(), "running command hook");
        let output = cmd.output().map_err(|e| GuardError::Hook {
            id: self.id.clone(),
            reason: e.to_string(),
        })?;

        let after = fingerprint(ctx.workdir, &files);
        let modified_files: Vec<PathBuf> = files
            .iter()
            .zip(before.iter().zip(after.iter()))
            .filter(|(_, (b, a))| b != a)
            .map(|(file, _)| file.clone())
            .collect();

        let status = if output.status.success() && modified_files.is_empty() {
            HookStatus::Passed
        } else {
            HookStatus::Failed
        };

        let mut diagnostics = Vec::new();
        if status == HookStatus::Failed {
            if let Some(code) = output.status.code().filter(|code| *code != 0) {
                diagnostics.push(format!("exit code: {code}"));
            }
            if !modified_files.is_empty() {
                diagnostics.push("files were modified by this hook".to_string());
            }
            for stream in [&output.stdout, &output.stderr] {
                diagnostics.extend(
                    String::from_utf8_lossy(stream)
                        .lines()
                        .filter(|line| !line.trim().is_empty())
                        .map(str::to_string),
                );
            }
            warn!(hook = %self.id, modified = modified_files.len(), "command hook failed");
        }

        Ok(HookOutcome {
            status,
            modified_files,
            diagnostics,
        })
    }
}

/// Content hash per file; `None` for files that cannot be read
fn fingerprint(workdir: &Path, files: &[PathBuf]) -> Vec<Option<u64>> {
    files
        .iter()
        .map(|file| {
            std::fs::read(workdir.join(file)).ok().map(|bytes| {
                let mut hasher = DefaultHasher::new();
                bytes.hash(&mut hasher);
                hasher.finish()
            })
        })
        .collect()
}

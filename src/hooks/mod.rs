//! Hook pipeline
//!
//! Every check runs behind the [`Hook`] trait: it receives the working-copy
//! file list and the staged change set, and answers with pass/fail plus the
//! files it modified. Two adapters exist:
//!
//! - [`GuardHook`] - the forbidden marker check, run in-process
//! - [`CommandHook`] - a locally available program (formatter, linter, ...)
//!
//! [`HookExecutor`] walks the configured repositories in order:
//!
//! ```yaml
//! hooks:
//!   fail_fast: false
//!   repos:
//!     - repo: https://github.com/psf/black
//!       rev: 22.3.0          # installed and run by the external hook runner
//!       hooks:
//!         - id: black
//!     - repo: local
//!       hooks:
//!         - id: no-commit
//!           builtin: marker_guard
//!           pass_filenames: false
//!         - id: ruff
//!           entry: ruff check
//!           files: '\.py$'
//! ```
//!
//! Hooks from pinned remote repositories are reported as skipped: markguard
//! never clones, checks out or installs them.

mod command;
mod executor;
mod filter;
mod guard;

pub use command::CommandHook;
pub use executor::{HookExecutor, HookReport, PipelineReport};
pub use filter::FileFilter;
pub use guard::GuardHook;

use crate::error::{GuardError, Result};
use crate::guard::StagedChangeSet;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Everything a hook may look at
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Repository working directory; commands run here
    pub workdir: &'a Path,
    /// Staged files, absolute paths
    pub files: &'a [PathBuf],
    /// Lines added by the pending commit
    pub changes: &'a StagedChangeSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HookStatus {
    Passed,
    Failed,
    Skipped,
}

impl fmt::Display for HookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HookStatus::Passed => "Passed",
            HookStatus::Failed => "Failed",
            HookStatus::Skipped => "Skipped",
        };
        f.write_str(label)
    }
}

/// Result of running one hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookOutcome {
    pub status: HookStatus,
    /// Files the hook rewrote, relative to the workdir
    pub modified_files: Vec<PathBuf>,
    /// Human-readable detail lines
    pub diagnostics: Vec<String>,
}

impl HookOutcome {
    pub fn passed() -> Self {
        Self {
            status: HookStatus::Passed,
            modified_files: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn failed(diagnostics: Vec<String>) -> Self {
        Self {
            status: HookStatus::Failed,
            modified_files: Vec::new(),
            diagnostics,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: HookStatus::Skipped,
            modified_files: Vec::new(),
            diagnostics: vec![reason.into()],
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == HookStatus::Failed
    }
}

/// A single check in the pre-commit pipeline
pub trait Hook {
    fn id(&self) -> &str;

    /// Run the check. `Err` means the hook could not be run at all.
    fn run(&self, ctx: &HookContext<'_>) -> Result<HookOutcome>;
}

/// Checks markguard runs in-process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    MarkerGuard,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::MarkerGuard => "marker_guard",
        }
    }
}

impl FromStr for Builtin {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "marker_guard" => Ok(Builtin::MarkerGuard),
            unknown => Err(GuardError::Config(format!("unknown builtin hook: {unknown}"))),
        }
    }
}

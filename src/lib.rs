//! # markguard - keep forbidden markers out of commits
//!
//! markguard is a git pre-commit guard. It inspects the lines added by the
//! pending commit and rejects the commit when any of them contains a
//! forbidden marker (`NO_COMMIT` unless configured otherwise).
//!
//! ## Quick Start
//!
//! ```bash
//! # Install the pre-commit hook in your repository
//! markguard install
//!
//! # Run the check by hand
//! markguard check
//!
//! # Or at the end of a pipeline
//! git diff --cached -U0 | markguard check --stdin
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use markguard::git::GitRepo;
//! use markguard::guard::{Marker, MarkerGuard};
//!
//! let changes = GitRepo::discover(".")?.staged_changes()?;
//! let result = MarkerGuard::new(Marker::new("NO_COMMIT")?).check(&changes);
//!
//! for line in result.offenders() {
//!     println!("{}: {}", line.location().unwrap_or_default(), line.content);
//! }
//! # Ok::<(), markguard::GuardError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod guard;
pub mod hooks;

pub use config::MarkguardConfig;
pub use error::{GuardError, Result};
pub use guard::{GuardResult, Marker, MarkerGuard, StagedChangeSet};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

//! Marker guard
//!
//! Decides whether a pending commit may proceed by looking for a forbidden
//! marker in the lines it adds. The guard is a pure classification over an
//! in-memory [`StagedChangeSet`]: computing that set (git, stdin) and acting
//! on the result (exit status) belong to the caller.
//!
//! ```
//! use markguard::guard::{GuardResult, Marker, MarkerGuard, StagedChangeSet};
//!
//! let guard = MarkerGuard::new(Marker::default());
//! let changes = StagedChangeSet::from_lines(["x = 1  # NO_COMMIT remove before merge"]);
//!
//! assert!(guard.check(&changes).is_blocked());
//! assert_eq!(guard.check(&StagedChangeSet::new()), GuardResult::Clean);
//! ```

mod changes;
mod diff;

pub use changes::{AddedLine, StagedChangeSet};
pub use diff::parse_unified_diff;

use crate::error::GuardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Marker used when nothing else is configured
pub const DEFAULT_MARKER: &str = "NO_COMMIT";

/// Literal token whose presence in an added line blocks the commit.
///
/// Matching is case-sensitive substring containment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Marker(String);

impl Marker {
    pub fn new(token: impl Into<String>) -> Result<Self, GuardError> {
        let token = token.into();
        if token.is_empty() {
            return Err(GuardError::EmptyMarker);
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_in(&self, line: &str) -> bool {
        line.contains(self.0.as_str())
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self(DEFAULT_MARKER.to_string())
    }
}

impl FromStr for Marker {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How much of the change set is scanned once a match is found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Scan every line and report all offenders
    #[default]
    Exhaustive,
    /// Stop at the first offender
    FirstMatch,
}

/// Outcome of one guard invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GuardResult {
    Clean,
    Blocked { offenders: Vec<AddedLine> },
}

impl GuardResult {
    pub fn is_blocked(&self) -> bool {
        matches!(self, GuardResult::Blocked { .. })
    }

    pub fn offenders(&self) -> &[AddedLine] {
        match self {
            GuardResult::Clean => &[],
            GuardResult::Blocked { offenders } => offenders,
        }
    }
}

/// Stateless marker check
#[derive(Debug, Clone)]
pub struct MarkerGuard {
    marker: Marker,
    mode: ScanMode,
}

impl MarkerGuard {
    pub fn new(marker: Marker) -> Self {
        Self {
            marker,
            mode: ScanMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Classify the change set. Blocked iff some line contains the marker.
    pub fn check(&self, changes: &StagedChangeSet) -> GuardResult {
        let mut matches = changes
            .lines()
            .iter()
            .filter(|line| self.marker.is_in(&line.content));

        let offenders: Vec<AddedLine> = match self.mode {
            ScanMode::Exhaustive => matches.cloned().collect(),
            ScanMode::FirstMatch => matches.next().cloned().into_iter().collect(),
        };

        debug!(
            marker = %self.marker,
            scanned = changes.len(),
            offenders = offenders.len(),
            "marker check finished"
        );

        if offenders.is_empty() {
            GuardResult::Clean
        } else {
            GuardResult::Blocked { offenders }
        }
    }
}

//! Styled terminal output
//!
//! User-facing messages, separate from tracing logs. Anything explaining why
//! a commit was rejected goes to stderr so hook runners surface it.

use crate::guard::AddedLine;
use crate::hooks::{HookReport, HookStatus};
use console::style;

/// Output handler for consistent CLI formatting
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn key_value(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<20} {}", style(key).dim(), value);
        }
    }

    /// Print an indented detail line on stderr
    pub fn detail(&self, message: &str) {
        eprintln!("    {message}");
    }

    /// One offending line of a blocked commit, always on stderr
    pub fn offender(&self, line: &AddedLine) {
        match line.location() {
            Some(location) => eprintln!(
                "  {} {} {}",
                style("•").red(),
                style(location).underlined(),
                line.content.trim()
            ),
            None => eprintln!("  {} {}", style("•").red(), line.content.trim()),
        }
    }

    /// pre-commit style `name....Passed` line
    pub fn hook_result(&self, report: &HookReport) {
        let status = match report.outcome.status {
            HookStatus::Passed => style(report.outcome.status.to_string()).green(),
            HookStatus::Failed => style(report.outcome.status.to_string()).red().bold(),
            HookStatus::Skipped => style(report.outcome.status.to_string()).dim(),
        };
        let dots = ".".repeat(60usize.saturating_sub(report.name.chars().count()).max(3));

        if report.outcome.is_failure() {
            eprintln!("{}{}{}", report.name, style(dots).dim(), status);
            eprintln!("  {} {}", style("- hook id:").dim(), report.id);
            for file in &report.outcome.modified_files {
                eprintln!("  {} {}", style("- modified:").dim(), file.display());
            }
            for line in &report.outcome.diagnostics {
                self.detail(line);
            }
        } else if !self.quiet {
            println!("{}{}{}", report.name, style(dots).dim(), status);
        }
    }
}

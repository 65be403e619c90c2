//! Unified diff reader
//!
//! Turns `git diff --cached -U0` output into a [`StagedChangeSet`] so the
//! guard can also sit at the end of a shell pipeline.

use super::changes::{AddedLine, StagedChangeSet};
use std::path::PathBuf;
use tracing::trace;

/// Parse unified diff text, keeping only added lines.
///
/// `-` lines, context lines and file/hunk metadata are ignored. Line numbers
/// come from the new side of each `@@` header.
pub fn parse_unified_diff(text: &str) -> StagedChangeSet {
    let mut changes = StagedChangeSet::new();
    let mut current_path: Option<PathBuf> = None;
    let mut hunk: Option<Hunk> = None;

    for raw in text.lines() {
        if let Some(state) = hunk.as_mut() {
            if let Some(content) = raw.strip_prefix('+') {
                let line = AddedLine {
                    path: current_path.clone(),
                    line_number: Some(state.next_line),
                    content: content.trim_end_matches('\r').to_string(),
                };
                trace!(?line, "added line");
                changes.push(line);
                state.next_line += 1;
                state.new_remaining = state.new_remaining.saturating_sub(1);
            } else if raw.starts_with('-') {
                state.old_remaining = state.old_remaining.saturating_sub(1);
            } else if raw.starts_with(' ') || raw.is_empty() {
                state.next_line += 1;
                state.old_remaining = state.old_remaining.saturating_sub(1);
                state.new_remaining = state.new_remaining.saturating_sub(1);
            }
            // `\ No newline at end of file` and anything unexpected fall through

            if state.is_done() {
                hunk = None;
            }
            continue;
        }

        if raw.starts_with("diff --git ") {
            current_path = None;
        } else if let Some(target) = raw.strip_prefix("+++ ") {
            current_path = parse_target_path(target);
        } else if let Some(header) = raw.strip_prefix("@@") {
            hunk = Hunk::parse(header).filter(|h| !h.is_done());
        }
    }

    changes
}

/// Position inside the hunk currently being read
#[derive(Debug)]
struct Hunk {
    next_line: u32,
    old_remaining: u32,
    new_remaining: u32,
}

impl Hunk {
    /// Parse ` -a,b +c,d @@ ...`; a missing count means 1
    fn parse(header: &str) -> Option<Self> {
        let mut parts = header.split_whitespace();
        let (_, old_count) = parse_range(parts.next()?.strip_prefix('-')?)?;
        let (new_start, new_count) = parse_range(parts.next()?.strip_prefix('+')?)?;
        Some(Self {
            next_line: new_start.max(1),
            old_remaining: old_count,
            new_remaining: new_count,
        })
    }

    fn is_done(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

fn parse_target_path(target: &str) -> Option<PathBuf> {
    let target = target.split('\t').next().unwrap_or(target).trim();
    if target == "/dev/null" {
        return None;
    }
    let target = target.trim_matches('"');
    Some(PathBuf::from(target.strip_prefix("b/").unwrap_or(target)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
diff --git a/app.py b/app.py
index 3b18e51..a5c1966 100644
--- a/app.py
+++ b/app.py
@@ -3 +3,2 @@ def main():
-    return 0
+    x = 1  # NO_COMMIT
+    return x
diff --git a/new.txt b/new.txt
new file mode 100644
index 0000000..e69de29
--- /dev/null
+++ b/new.txt
@@ -0,0 +1 @@
+hello
";

    #[test]
    fn test_parses_added_lines_with_locations() {
        let changes = parse_unified_diff(SAMPLE);
        let lines = changes.lines();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], AddedLine::at("app.py", 3, "    x = 1  # NO_COMMIT"));
        assert_eq!(lines[1], AddedLine::at("app.py", 4, "    return x"));
        assert_eq!(lines[2], AddedLine::at("new.txt", 1, "hello"));
    }

    #[test]
    fn test_ignores_removed_and_header_lines() {
        let changes = parse_unified_diff(SAMPLE);
        assert!(changes.lines().iter().all(|l| !l.content.contains("return 0")));
        assert!(changes.lines().iter().all(|l| !l.content.starts_with("++")));
    }

    #[test]
    fn test_added_line_that_looks_like_header() {
        let diff = "\
--- a/notes.md
+++ b/notes.md
@@ -1,0 +2 @@
+++ not a header
";
        let changes = parse_unified_diff(diff);
        assert_eq!(changes.lines(), &[AddedLine::at("notes.md", 2, "++ not a header")]);
    }

    #[test]
    fn test_deleted_file_has_no_added_lines() {
        let diff = "\
diff --git a/gone.txt b/gone.txt
deleted file mode 100644
--- a/gone.txt
+++ /dev/null
@@ -1 +0,0 @@
-NO_COMMIT
";
        assert!(parse_unified_diff(diff).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_unified_diff("").is_empty());
    }

    #[test]
    fn test_hunk_header_parsing() {
        let hunk = Hunk::parse(" -3 +3,2 @@ def main():").unwrap();
        assert_eq!((hunk.next_line, hunk.old_remaining, hunk.new_remaining), (3, 1, 2));

        let hunk = Hunk::parse(" -0,0 +1 @@").unwrap();
        assert_eq!((hunk.next_line, hunk.old_remaining, hunk.new_remaining), (1, 0, 1));

        assert!(Hunk::parse(" garbage").is_none());
    }

    #[test]
    fn test_multiple_hunks_without_git_headers() {
        let diff = "\
--- a/one.txt
+++ b/one.txt
@@ -1 +1 @@
-old
+new NO_COMMIT
--- a/two.txt
+++ b/two.txt
@@ -5,0 +6,2 @@
+first
+second
";
        let changes = parse_unified_diff(diff);
        assert_eq!(
            changes.lines(),
            &[
                AddedLine::at("one.txt", 1, "new NO_COMMIT"),
                AddedLine::at("two.txt", 6, "first"),
                AddedLine::at("two.txt", 7, "second"),
            ]
        );
    }
}

use serde::Serialize;
use std::path::PathBuf;

/// A single line added to the index, as reported by a zero-context diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedLine {
    /// Repository-relative path, when the diff source knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// 1-based line number on the new side of the diff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,

    /// Line text without the leading `+` and trailing newline
    pub content: String,
}

impl AddedLine {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            path: None,
            line_number: None,
            content: content.into(),
        }
    }

    pub fn at(path: impl Into<PathBuf>, line_number: u32, content: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            line_number: Some(line_number),
            content: content.into(),
        }
    }

    /// `path:line` when both are known, otherwise whatever is available
    pub fn location(&self) -> Option<String> {
        match (&self.path, self.line_number) {
            (Some(path), Some(line)) => Some(format!("{}:{}", path.display(), line)),
            (Some(path), None) => Some(path.display().to_string()),
            (None, Some(line)) => Some(format!("line {line}")),
            (None, None) => None,
        }
    }
}

/// Ordered sequence of lines added by the pending commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedChangeSet {
    lines: Vec<AddedLine>,
}

impl StagedChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a change set from bare line texts with no location information.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lines.into_iter().map(AddedLine::new).collect()
    }

    pub fn push(&mut self, line: AddedLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[AddedLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct files contributing lines
    pub fn file_count(&self) -> usize {
        let mut paths: Vec<_> = self.lines.iter().filter_map(|l| l.path.as_ref()).collect();
        paths.sort();
        paths.dedup();
        paths.len()
    }
}

impl FromIterator<AddedLine> for StagedChangeSet {
    fn from_iter<T: IntoIterator<Item = AddedLine>>(iter: T) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StagedChangeSet {
    type Item = &'a AddedLine;
    type IntoIter = std::slice::Iter<'a, AddedLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_formats() {
        assert_eq!(
            AddedLine::at("src/app.py", 12, "x").location().as_deref(),
            Some("src/app.py:12")
        );
        assert_eq!(AddedLine::new("x").location(), None);
    }

    #[test]
    fn test_file_count_dedups_paths() {
        let changes: StagedChangeSet = vec![
            AddedLine::at("a.py", 1, "one"),
            AddedLine::at("a.py", 2, "two"),
            AddedLine::at("b.py", 1, "three"),
            AddedLine::new("orphan"),
        ]
        .into_iter()
        .collect();

        assert_eq!(changes.len(), 4);
        assert_eq!(changes.file_count(), 2);
    }
}

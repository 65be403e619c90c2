use crate::config::HookEntry;
use crate::error::{GuardError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

/// `files` / `exclude` regexes of a hook, matched against workdir-relative paths
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl FileFilter {
    pub fn from_entry(entry: &HookEntry) -> Result<Self> {
        Ok(Self {
            include: compile(&entry.id, entry.files.as_deref())?,
            exclude: compile(&entry.id, entry.exclude.as_deref())?,
        })
    }

    pub fn matches(&self, relative: &str) -> bool {
        let included = self.include.as_ref().is_none_or(|re| re.is_match(relative));
        let excluded = self.exclude.as_ref().is_some_and(|re| re.is_match(relative));
        included && !excluded
    }

    /// Keep the files that pass the filter, returned relative to `workdir`
    pub fn apply(&self, workdir: &Path, files: &[PathBuf]) -> Vec<PathBuf> {
        files
            .iter()
            .map(|file| file.strip_prefix(workdir).unwrap_or(file).to_path_buf())
            .filter(|relative| self.matches(&relative.to_string_lossy().replace('\\', "/")))
            .collect()
    }
}

fn compile(hook: &str, pattern: Option<&str>) -> Result<Option<Regex>> {
    pattern
        .map(|p| {
            Regex::new(p).map_err(|source| GuardError::InvalidPattern {
                hook: hook.to_string(),
                pattern: p.to_string(),
                source,
            })
        })
        .transpose()
}

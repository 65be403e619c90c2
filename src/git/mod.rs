//! Git integration layer for markguard
//!
//! Computes the staged change set with git2 and manages the pre-commit hook
//! script in the repository's hooks directory.

use crate::error::{GuardError, Result};
use crate::guard::{AddedLine, StagedChangeSet};
use git2::{
    DiffFindOptions, DiffOptions, ErrorCode, Index, Repository, Status, StatusOptions, Tree,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Line written into hook scripts so markguard can recognise its own hooks
pub const HOOK_SIGNATURE: &str = "# installed by markguard";

/// Set by git when a hook runs against a temporary index (`commit -a`, `commit <paths>`)
const INDEX_FILE_ENV: &str = "GIT_INDEX_FILE";

/// Git repository handle
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discover the repository containing `path`.
    ///
    /// Honours `GIT_INDEX_FILE`, so a hook started by `git commit -a` sees the
    /// index git is about to commit rather than the one on disk.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let index_file = std::env::var_os(INDEX_FILE_ENV).map(PathBuf::from);
        Self::discover_with_index(path, index_file.as_deref())
    }

    /// Discover the repository containing `path`, reading staged state from
    /// `index_file` when given
    pub fn discover_with_index<P: AsRef<Path>>(
        path: P,
        index_file: Option<&Path>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|e| {
            GuardError::input_unavailable(
                format!("no git repository found at {}", path.display()),
                e,
            )
        })?;
        debug!(git_dir = %repo.path().display(), "opened repository");

        if let Some(index_file) = index_file {
            let mut index = Index::open(index_file).map_err(|e| {
                GuardError::input_unavailable(
                    format!("failed to open index {}", index_file.display()),
                    e,
                )
            })?;
            repo.set_index(&mut index)
                .map_err(|e| GuardError::input_unavailable("failed to attach index", e))?;
            debug!(index = %index_file.display(), "using alternate index");
        }

        Ok(Self { repo })
    }

    /// Working directory; bare repositories have nothing staged to inspect
    pub fn workdir(&self) -> Result<&Path> {
        self.repo.workdir().ok_or_else(|| GuardError::InputUnavailable {
            context: "repository has no working directory".to_string(),
            source: None,
        })
    }

    /// Lines added by the index relative to `HEAD`, zero lines of context.
    ///
    /// An unborn `HEAD` compares against the empty tree, so every staged line
    /// of the first commit is included.
    pub fn staged_changes(&self) -> Result<StagedChangeSet> {
        self.workdir()?;
        let head_tree = self.head_tree()?;

        let mut opts = DiffOptions::new();
        opts.context_lines(0);

        let mut diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
            .map_err(|e| GuardError::input_unavailable("failed to diff index against HEAD", e))?;

        // Pure renames contribute no added lines, as with `git diff --cached`
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))
            .map_err(|e| GuardError::input_unavailable("failed to detect renames", e))?;

        let mut changes = StagedChangeSet::new();
        diff.foreach(
            &mut |_delta, _progress| true,
            None,
            None,
            Some(&mut |delta, _hunk, line| {
                if line.origin() == '+' {
                    let content = String::from_utf8_lossy(line.content());
                    changes.push(AddedLine {
                        path: delta.new_file().path().map(Path::to_path_buf),
                        line_number: line.new_lineno(),
                        content: content.trim_end_matches(['\n', '\r']).to_string(),
                    });
                }
                true
            }),
        )
        .map_err(|e| GuardError::input_unavailable("failed to walk staged diff", e))?;

        debug!(
            lines = changes.len(),
            files = changes.file_count(),
            "collected staged changes"
        );
        Ok(changes)
    }

    /// Files staged for commit, deletions excluded, as absolute paths
    pub fn staged_files(&self) -> Result<Vec<PathBuf>> {
        let workdir = self.workdir()?;
        let mut opts = StatusOptions::new();
        opts.include_ignored(false);
        opts.include_untracked(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GuardError::input_unavailable("failed to read repository status", e))?;

        let mut files = Vec::new();
        for entry in statuses.iter() {
            if entry.status().intersects(
                Status::INDEX_NEW
                    | Status::INDEX_MODIFIED
                    | Status::INDEX_RENAMED
                    | Status::INDEX_TYPECHANGE,
            ) {
                if let Some(path) = entry.path() {
                    files.push(workdir.join(path));
                }
            }
        }
        files.sort();

        Ok(files)
    }

    fn head_tree(&self) -> Result<Option<Tree<'_>>> {
        match self.repo.head() {
            Ok(head) => {
                let tree = head
                    .peel_to_tree()
                    .map_err(|e| GuardError::input_unavailable("failed to read HEAD tree", e))?;
                Ok(Some(tree))
            }
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                debug!("HEAD is unborn, diffing against the empty tree");
                Ok(None)
            }
            Err(e) => Err(GuardError::input_unavailable("failed to resolve HEAD", e)),
        }
    }

    fn hook_path(&self, hook_name: &str) -> PathBuf {
        self.repo.path().join("hooks").join(hook_name)
    }

    /// Whether a hook script exists
    pub fn hook_exists(&self, hook_name: &str) -> bool {
        self.hook_path(hook_name).exists()
    }

    /// Whether the hook script exists and was written by markguard
    pub fn hook_is_ours(&self, hook_name: &str) -> Result<bool> {
        let path = self.hook_path(hook_name);
        if !path.exists() {
            return Ok(false);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(content.contains(HOOK_SIGNATURE))
    }

    /// Write a hook script and make it executable
    pub fn install_hook(&self, hook_name: &str, hook_content: &str) -> Result<PathBuf> {
        let hook_path = self.hook_path(hook_name);
        if let Some(hooks_dir) = hook_path.parent() {
            std::fs::create_dir_all(hooks_dir)?;
        }
        std::fs::write(&hook_path, hook_content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&hook_path)?.permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&hook_path, perms)?;
        }

        debug!(hook = hook_name, path = %hook_path.display(), "installed hook");
        Ok(hook_path)
    }

    /// Remove a hook script if present
    pub fn remove_hook(&self, hook_name: &str) -> Result<bool> {
        let hook_path = self.hook_path(hook_name);
        if !hook_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&hook_path)?;
        Ok(true)
    }
}

/// Script body for the pre-commit hook
pub fn pre_commit_script() -> String {
    format!("#!/bin/sh\n{HOOK_SIGNATURE}\nexec markguard check \"$@\"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn stage(repo: &Repository, dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
    }

    fn commit_index(repo: &Repository) {
        let mut index = repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &parents)
            .unwrap();
    }

    #[test]
    fn test_unborn_head_reports_all_staged_lines() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "app.py", "def foo():\n    return 1\n");

        let changes = GitRepo::discover(dir.path()).unwrap().staged_changes().unwrap();
        assert_eq!(
            changes.lines(),
            &[
                AddedLine::at("app.py", 1, "def foo():"),
                AddedLine::at("app.py", 2, "    return 1"),
            ]
        );
    }

    #[test]
    fn test_only_added_lines_after_commit() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "app.py", "a\nb\nc\n");
        commit_index(&repo);
        stage(&repo, dir.path(), "app.py", "a\nNO_COMMIT\nc\n");

        let changes = GitRepo::discover(dir.path()).unwrap().staged_changes().unwrap();
        assert_eq!(changes.lines(), &[AddedLine::at("app.py", 2, "NO_COMMIT")]);
    }

    #[test]
    fn test_pure_rename_adds_no_lines() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "old.py", "a = 1\nb = 2\nc = 3\n# NO_COMMIT legacy\n");
        commit_index(&repo);

        fs::rename(dir.path().join("old.py"), dir.path().join("new.py")).unwrap();
        let mut index = repo.index().unwrap();
        index.remove_path(Path::new("old.py")).unwrap();
        index.add_path(Path::new("new.py")).unwrap();
        index.write().unwrap();

        let changes = GitRepo::discover(dir.path()).unwrap().staged_changes().unwrap();
        assert!(changes.is_empty(), "unexpected lines: {:?}", changes.lines());
    }

    #[test]
    fn test_alternate_index_is_used() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "app.py", "clean\n");
        commit_index(&repo);

        // Stage the marker, keep a copy of that index, then unstage it again
        stage(&repo, dir.path(), "app.py", "clean\nNO_COMMIT\n");
        let alternate = dir.path().join(".git/next-index.lock");
        fs::copy(dir.path().join(".git/index"), &alternate).unwrap();
        let head_tree = repo.head().unwrap().peel_to_tree().unwrap();
        let mut index = repo.index().unwrap();
        index.read_tree(&head_tree).unwrap();
        index.write().unwrap();

        let git = GitRepo::discover_with_index(dir.path(), None).unwrap();
        assert!(git.staged_changes().unwrap().is_empty());
        assert!(git.staged_files().unwrap().is_empty());

        let git = GitRepo::discover_with_index(dir.path(), Some(&alternate)).unwrap();
        assert_eq!(
            git.staged_changes().unwrap().lines(),
            &[AddedLine::at("app.py", 2, "NO_COMMIT")]
        );
        assert_eq!(git.staged_files().unwrap(), vec![git.workdir().unwrap().join("app.py")]);
    }

    #[test]
    fn test_unstaged_edits_are_ignored() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "app.py", "clean\n");
        fs::write(dir.path().join("app.py"), "clean\nNO_COMMIT\n").unwrap();

        let changes = GitRepo::discover(dir.path()).unwrap().staged_changes().unwrap();
        assert_eq!(changes.lines(), &[AddedLine::at("app.py", 1, "clean")]);
    }

    #[test]
    fn test_nothing_staged_is_empty() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "app.py", "a\n");
        commit_index(&repo);

        let git = GitRepo::discover(dir.path()).unwrap();
        assert!(git.staged_changes().unwrap().is_empty());
        assert!(git.staged_files().unwrap().is_empty());
    }

    #[test]
    fn test_staged_files_are_absolute() {
        let (dir, repo) = init_repo();
        stage(&repo, dir.path(), "b.py", "b\n");
        stage(&repo, dir.path(), "a.py", "a\n");

        let git = GitRepo::discover(dir.path()).unwrap();
        let files = git.staged_files().unwrap();
        let workdir = git.workdir().unwrap();
        assert_eq!(files, vec![workdir.join("a.py"), workdir.join("b.py")]);
    }

    #[test]
    fn test_discover_outside_repository_is_input_unavailable() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("not-a-repo");
        fs::create_dir(&nested).unwrap();

        // A TempDir may itself live inside a repository on developer machines
        if Repository::discover(&nested).is_err() {
            assert!(matches!(
                GitRepo::discover(&nested),
                Err(GuardError::InputUnavailable { .. })
            ));
        }
    }

    #[test]
    fn test_hook_install_and_remove() {
        let (dir, _repo) = init_repo();
        let git = GitRepo::discover(dir.path()).unwrap();

        assert!(!git.hook_exists("pre-commit"));
        git.install_hook("pre-commit", &pre_commit_script()).unwrap();
        assert!(git.hook_exists("pre-commit"));
        assert!(git.hook_is_ours("pre-commit").unwrap());

        assert!(git.remove_hook("pre-commit").unwrap());
        assert!(!git.hook_exists("pre-commit"));
        assert!(!git.remove_hook("pre-commit").unwrap());
    }
}

//! Git repository adapter.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use git2::{BranchType, ErrorCode, Repository as Git2Repo, Status, StatusOptions};
use tracing::{info, warn};

use crate::command::GitCommand;
use crate::{BranchLookup, BranchMatch, GitError, GitResult, MergeMode, Repository, Side};

/// A working copy plus its single named remote.
///
/// Queries go through `git2`; working-tree mutations and network operations
/// run the system `git` binary so that hooks, credentials and merge drivers
/// behave exactly as they do for the user.
#[derive(Debug, Clone)]
pub struct GitRepository {
    path: PathBuf,
    remote: String,
}

impl GitRepository {
    /// Opens the working copy rooted at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not the root of a non-bare repository.
    pub fn open(path: impl AsRef<Path>, remote: impl Into<String>) -> GitResult<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::open(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        let work_tree = repo
            .workdir()
            .ok_or_else(|| GitError::NotARepo(path.to_path_buf()))?
            .to_path_buf();

        Ok(Self {
            path: work_tree,
            remote: remote.into(),
        })
    }

    fn git2(&self) -> GitResult<Git2Repo> {
        Git2Repo::open(&self.path).map_err(GitError::from)
    }

    fn git(&self) -> GitCommand<'_> {
        GitCommand::new(&self.path)
    }

    fn local_branches(&self) -> GitResult<Vec<String>> {
        let repo = self.git2()?;
        let mut names = Vec::new();
        for entry in repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

/// Returns the porcelain status marker for a conflicted index entry, given
/// which of the base, ours and theirs stages are present.
#[must_use]
pub fn conflict_marker(ancestor: bool, ours: bool, theirs: bool) -> &'static str {
    match (ancestor, ours, theirs) {
        (true, false, false) => "DD",
        (false, true, false) => "AU",
        (true, true, false) => "UD",
        (false, false, true) => "UA",
        (true, false, true) => "DU",
        (false, true, true) => "AA",
        _ => "UU",
    }
}

impl Repository for GitRepository {
    fn local_path(&self) -> &Path {
        &self.path
    }

    fn remote_name(&self) -> &str {
        &self.remote
    }

    fn is_clean(&self) -> GitResult<()> {
        let repo = self.git2()?;
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = repo.statuses(Some(&mut options))?;
        let dirty: Vec<String> = statuses
            .iter()
            .filter(|entry| entry.status() != Status::CURRENT && !entry.status().is_ignored())
            .filter_map(|entry| entry.path().map(String::from))
            .collect();

        if dirty.is_empty() {
            Ok(())
        } else {
            Err(GitError::DirtyWorkingTree(dirty))
        }
    }

    fn fetch(&self) -> GitResult<()> {
        self.git().run(&["fetch", &self.remote, "--prune"])?;
        Ok(())
    }

    fn current_branch(&self) -> GitResult<Option<String>> {
        let repo = self.git2()?;
        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(String::from))
        } else {
            Ok(None)
        }
    }

    fn has_branch(&self, matcher: &BranchMatch) -> GitResult<BranchLookup> {
        let repo = self.git2()?;
        let remote_prefix = format!("{}/", self.remote);
        let mut lookup = BranchLookup::default();

        for entry in repo.branches(None)? {
            let (branch, branch_type) = entry?;
            let Some(name) = branch.name()? else {
                continue;
            };

            match branch_type {
                BranchType::Local => {
                    if matcher.matches(name) {
                        lookup.local.push(name.to_string());
                    }
                }
                BranchType::Remote => {
                    if let Some(short) = name.strip_prefix(&remote_prefix)
                        && short != "HEAD"
                        && matcher.matches(short)
                    {
                        lookup.remote.push(short.to_string());
                    }
                }
            }
        }

        lookup.local.sort();
        lookup.remote.sort();
        Ok(lookup)
    }

    fn checkout_branch(&self, name: &str) -> GitResult<()> {
        self.git().run(&["checkout", name])?;
        Ok(())
    }

    fn create_branch(&self, name: &str) -> GitResult<()> {
        self.git().run(&["checkout", "-b", name])?;
        Ok(())
    }

    fn merge_branch(&self, name: &str, mode: MergeMode) -> GitResult<()> {
        self.git().run(&["merge", mode.flag(), "--no-edit", name])?;
        Ok(())
    }

    fn merge_conflicts(&self) -> GitResult<BTreeMap<String, String>> {
        let repo = self.git2()?;
        let index = repo.index()?;
        let mut conflicts = BTreeMap::new();

        for conflict in index.conflicts()? {
            let conflict = conflict?;
            let path = [&conflict.our, &conflict.their, &conflict.ancestor]
                .into_iter()
                .flatten()
                .next()
                .map(|entry| String::from_utf8_lossy(&entry.path).into_owned());

            if let Some(path) = path {
                let marker = conflict_marker(
                    conflict.ancestor.is_some(),
                    conflict.our.is_some(),
                    conflict.their.is_some(),
                );
                conflicts.insert(path, marker.to_string());
            }
        }

        Ok(conflicts)
    }

    fn checkout_file(&self, path: &str, side: Side) -> GitResult<()> {
        let flag = match side {
            Side::Ours => "--ours",
            Side::Theirs => "--theirs",
        };
        self.git().run(&["checkout", flag, "--", path])?;
        Ok(())
    }

    fn continue_merge(&self) -> GitResult<()> {
        self.git().run(&["commit", "--no-edit"])?;
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> GitResult<()> {
        self.git().run(&["branch", "-D", name])?;
        Ok(())
    }

    fn add_file(&self, path: &str) -> GitResult<()> {
        self.git().run(&["add", "--", path])?;
        Ok(())
    }

    fn commit_changes(&self, message: &str) -> GitResult<()> {
        let git = self.git();
        git.run(&["add", "--all"])?;
        git.run(&["commit", "-m", message])?;
        Ok(())
    }

    fn tag_commit(&self, tag: &str, message: &str) -> GitResult<()> {
        let repo = self.git2()?;
        let head = repo.head()?;
        let commit = head.peel_to_commit()?;
        let sig = repo.signature()?;

        repo.tag(tag, commit.as_object(), &sig, message, false)?;

        Ok(())
    }

    fn push_all_changes(&self) -> GitResult<()> {
        self.git().run(&["push", &self.remote, "--all"])?;
        Ok(())
    }

    fn push_all_tags(&self) -> GitResult<()> {
        self.git().run(&["push", &self.remote, "--tags"])?;
        Ok(())
    }

    fn push_deletion(&self, name: &str) -> GitResult<()> {
        self.git().run(&["push", &self.remote, "--delete", name])?;
        Ok(())
    }

    fn file_at(&self, branch: &str, path: &str) -> GitResult<Option<Vec<u8>>> {
        let repo = self.git2()?;
        let spec = format!("{branch}:{path}");

        match repo.revparse_single(&spec) {
            Ok(object) => {
                let blob = object.peel_to_blob()?;
                Ok(Some(blob.content().to_vec()))
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn undo_all_changes(&self, production: &str) -> GitResult<()> {
        warn!(branch = production, "discarding local changes");
        let git = self.git();
        let upstream = format!("{}/{production}", self.remote);

        git.run(&["fetch", &self.remote, "--prune"])?;
        git.run(&["checkout", "--force", production])?;
        git.run(&["reset", "--hard", &upstream])?;
        git.run(&["clean", "-fd"])?;

        for branch in self.local_branches()? {
            if branch != production {
                git.run(&["branch", "-D", &branch])?;
            }
        }

        info!(branch = production, "local working copy reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// A working copy cloned from a bare remote, with `main` pushed.
    fn create_test_repo() -> (TempDir, GitRepository) {
        let temp_dir = TempDir::new().unwrap();
        let remote = temp_dir.path().join("remote.git");
        let work = temp_dir.path().join("work");
        fs::create_dir_all(&remote).unwrap();
        fs::create_dir_all(&work).unwrap();

        GitCommand::new(&remote)
            .run(&["init", "--bare", "--quiet"])
            .unwrap();

        let git = GitCommand::new(&work);
        git.run(&["init", "--quiet"]).unwrap();
        git.run(&["symbolic-ref", "HEAD", "refs/heads/main"]).unwrap();
        git.run(&["config", "user.name", "Test User"]).unwrap();
        git.run(&["config", "user.email", "test@example.com"])
            .unwrap();
        git.run(&["remote", "add", "origin", remote.to_str().unwrap()])
            .unwrap();

        fs::write(work.join("VERSION"), "1.0.0\n").unwrap();
        git.run(&["add", "--all"]).unwrap();
        git.run(&["commit", "-m", "Initial commit"]).unwrap();
        git.run(&["push", "--quiet", "origin", "main"]).unwrap();

        let repo = GitRepository::open(&work, "origin").unwrap();
        (temp_dir, repo)
    }

    fn read(repo: &GitRepository, path: &str) -> String {
        fs::read_to_string(repo.local_path().join(path)).unwrap()
    }

    #[test]
    fn test_open_not_a_repo() {
        let temp_dir = TempDir::new().unwrap();
        let result = GitRepository::open(temp_dir.path(), "origin");
        assert!(matches!(result, Err(GitError::NotARepo(_))));
    }

    #[test]
    fn test_remote_name() {
        let (_temp_dir, repo) = create_test_repo();
        assert_eq!(repo.remote_name(), "origin");
    }

    #[test]
    fn test_is_clean() {
        let (_temp_dir, repo) = create_test_repo();
        assert!(repo.is_clean().is_ok());

        fs::write(repo.local_path().join("VERSION"), "2.0.0\n").unwrap();
        fs::write(repo.local_path().join("new.txt"), "new").unwrap();

        match repo.is_clean() {
            Err(GitError::DirtyWorkingTree(paths)) => {
                assert!(paths.contains(&"VERSION".to_string()));
                assert!(paths.contains(&"new.txt".to_string()));
            }
            other => panic!("expected dirty working tree, got {other:?}"),
        }
    }

    #[test]
    fn test_current_branch() {
        let (_temp_dir, repo) = create_test_repo();
        assert_eq!(repo.current_branch().unwrap(), Some("main".to_string()));

        repo.create_branch("develop").unwrap();
        assert_eq!(repo.current_branch().unwrap(), Some("develop".to_string()));
    }

    #[test]
    fn test_has_branch_local_and_remote() {
        let (_temp_dir, repo) = create_test_repo();
        repo.create_branch("release/1.1.0").unwrap();

        let matcher = BranchMatch::Prefix("release/".to_string());
        let lookup = repo.has_branch(&matcher).unwrap();
        assert_eq!(lookup.local, vec!["release/1.1.0".to_string()]);
        assert!(lookup.remote.is_empty());

        repo.push_all_changes().unwrap();
        let lookup = repo.has_branch(&matcher).unwrap();
        assert_eq!(lookup.remote, vec!["release/1.1.0".to_string()]);

        let missing = repo
            .has_branch(&BranchMatch::Exact("develop".to_string()))
            .unwrap();
        assert!(!missing.found());
    }

    #[test]
    fn test_commit_and_file_at() {
        let (_temp_dir, repo) = create_test_repo();
        repo.create_branch("develop").unwrap();
        fs::write(repo.local_path().join("VERSION"), "1.1.0-dev\n").unwrap();
        repo.commit_changes("Set next minor project version.")
            .unwrap();

        assert_eq!(
            repo.file_at("develop", "VERSION").unwrap(),
            Some(b"1.1.0-dev\n".to_vec())
        );
        assert_eq!(
            repo.file_at("main", "VERSION").unwrap(),
            Some(b"1.0.0\n".to_vec())
        );
        assert_eq!(repo.file_at("main", "missing.txt").unwrap(), None);
        assert!(repo.is_clean().is_ok());
    }

    #[test]
    fn test_merge_no_fast_forward_creates_merge_commit() {
        let (_temp_dir, repo) = create_test_repo();
        repo.create_branch("release/1.0.1").unwrap();
        fs::write(repo.local_path().join("notes.txt"), "fix").unwrap();
        repo.commit_changes("Add notes").unwrap();

        repo.checkout_branch("main").unwrap();
        repo.merge_branch("release/1.0.1", MergeMode::NoFastForward)
            .unwrap();

        let git2 = repo.git2().unwrap();
        let head = git2.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.parent_count(), 2);
    }

    #[test]
    fn test_merge_conflict_resolution_with_theirs() {
        let (_temp_dir, repo) = create_test_repo();

        repo.create_branch("release/1.1.0").unwrap();
        fs::write(repo.local_path().join("VERSION"), "1.1.0\n").unwrap();
        repo.commit_changes("Remove qualifier from project version.")
            .unwrap();

        repo.checkout_branch("main").unwrap();
        fs::write(repo.local_path().join("VERSION"), "1.0.1\n").unwrap();
        repo.commit_changes("Set next hotfix version.").unwrap();

        let err = repo
            .merge_branch("release/1.1.0", MergeMode::NoFastForward)
            .unwrap_err();
        assert!(matches!(err, GitError::CommandFailed { .. }));

        let conflicts = repo.merge_conflicts().unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts.get("VERSION").map(String::as_str), Some("UU"));

        repo.checkout_file("VERSION", Side::Theirs).unwrap();
        repo.add_file("VERSION").unwrap();
        repo.continue_merge().unwrap();

        assert!(repo.merge_conflicts().unwrap().is_empty());
        assert_eq!(read(&repo, "VERSION"), "1.1.0\n");
        assert!(repo.is_clean().is_ok());
    }

    #[test]
    fn test_tag_commit() {
        let (_temp_dir, repo) = create_test_repo();
        repo.tag_commit("1.0.0", "Release 1.0.0").unwrap();

        let git2 = repo.git2().unwrap();
        let tags = git2.tag_names(None).unwrap();
        assert!(tags.iter().flatten().any(|t| t == "1.0.0"));

        assert!(repo.tag_commit("1.0.0", "Duplicate").is_err());
    }

    #[test]
    fn test_push_tags_and_deletion() {
        let (_temp_dir, repo) = create_test_repo();
        repo.create_branch("hotfix/1.0.1").unwrap();
        repo.push_all_changes().unwrap();
        repo.tag_commit("1.0.1", "Hotfix 1.0.1").unwrap();
        repo.push_all_tags().unwrap();

        repo.checkout_branch("main").unwrap();
        repo.delete_branch("hotfix/1.0.1").unwrap();
        repo.push_deletion("hotfix/1.0.1").unwrap();
        repo.fetch().unwrap();

        let lookup = repo
            .has_branch(&BranchMatch::Prefix("hotfix/".to_string()))
            .unwrap();
        assert!(!lookup.found());
    }

    #[test]
    fn test_undo_all_changes() {
        let (_temp_dir, repo) = create_test_repo();
        repo.create_branch("develop").unwrap();
        repo.create_branch("release/1.1.0").unwrap();
        fs::write(repo.local_path().join("VERSION"), "1.1.0\n").unwrap();
        repo.commit_changes("Remove qualifier from project version.")
            .unwrap();
        fs::write(repo.local_path().join("scratch.txt"), "left over").unwrap();

        repo.undo_all_changes("main").unwrap();

        assert_eq!(repo.current_branch().unwrap(), Some("main".to_string()));
        assert_eq!(repo.local_branches().unwrap(), vec!["main".to_string()]);
        assert_eq!(read(&repo, "VERSION"), "1.0.0\n");
        assert!(repo.is_clean().is_ok());
    }

    #[test]
    fn test_conflict_marker() {
        assert_eq!(conflict_marker(true, true, true), "UU");
        assert_eq!(conflict_marker(false, true, true), "AA");
        assert_eq!(conflict_marker(true, false, false), "DD");
        assert_eq!(conflict_marker(true, true, false), "UD");
        assert_eq!(conflict_marker(true, false, true), "DU");
        assert_eq!(conflict_marker(false, true, false), "AU");
        assert_eq!(conflict_marker(false, false, true), "UA");
    }
}

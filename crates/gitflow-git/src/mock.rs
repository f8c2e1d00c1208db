//! In-memory [`Repository`] for exercising workflows without git.
//!
//! The mock tracks branches, the checked out branch, dirty paths, pending
//! conflicts and tags, and records every call as `"<operation> <args>"`.
//! Files under [`Repository::local_path`] are real; only version control is
//! simulated.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{BranchLookup, BranchMatch, GitError, GitResult, MergeMode, Repository, Side};

#[derive(Debug, Default)]
struct MockState {
    local: BTreeSet<String>,
    remote: BTreeSet<String>,
    current: Option<String>,
    dirty: Vec<String>,
    conflicts: BTreeMap<String, String>,
    files: HashMap<(String, String), Vec<u8>>,
    tags: Vec<String>,
    calls: Vec<String>,
    fail_on: HashSet<String>,
}

/// A recording test double for [`Repository`].
#[derive(Debug)]
pub struct MockRepository {
    path: PathBuf,
    remote: String,
    state: Mutex<MockState>,
}

impl MockRepository {
    /// Creates an empty mock rooted at `path` with remote `origin`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            remote: "origin".to_string(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// Adds a local branch. The first local branch becomes the current one.
    #[must_use]
    pub fn with_local_branch(mut self, name: &str) -> Self {
        let state = self.state_mut();
        state.local.insert(name.to_string());
        if state.current.is_none() {
            state.current = Some(name.to_string());
        }
        self
    }

    /// Adds a branch that only exists on the remote.
    #[must_use]
    pub fn with_remote_branch(mut self, name: &str) -> Self {
        self.state_mut().remote.insert(name.to_string());
        self
    }

    /// Marks a path as modified so that [`Repository::is_clean`] fails.
    #[must_use]
    pub fn with_dirty(mut self, path: &str) -> Self {
        self.state_mut().dirty.push(path.to_string());
        self
    }

    /// Makes the next merge stop with the given conflicted paths.
    #[must_use]
    pub fn with_conflicts(mut self, paths: &[(&str, &str)]) -> Self {
        self.state_mut().conflicts = paths
            .iter()
            .map(|(path, marker)| ((*path).to_string(), (*marker).to_string()))
            .collect();
        self
    }

    /// Sets the content returned by [`Repository::file_at`].
    #[must_use]
    pub fn with_file_at(mut self, branch: &str, path: &str, content: &[u8]) -> Self {
        self.state_mut()
            .files
            .insert((branch.to_string(), path.to_string()), content.to_vec());
        self
    }

    /// Makes every call to the named operation fail.
    #[must_use]
    pub fn fail_on(mut self, operation: &str) -> Self {
        self.state_mut().fail_on.insert(operation.to_string());
        self
    }

    /// Marks a path as modified on a shared mock, e.g. from inside a hook.
    pub fn mark_dirty(&self, path: &str) {
        self.state().dirty.push(path.to_string());
    }

    /// Returns the recorded calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Returns true if an operation with the given name was called.
    #[must_use]
    pub fn called(&self, operation: &str) -> bool {
        self.state()
            .calls
            .iter()
            .any(|call| call.split(' ').next() == Some(operation))
    }

    /// Returns the local branches.
    #[must_use]
    pub fn local_branches(&self) -> Vec<String> {
        self.state().local.iter().cloned().collect()
    }

    /// Returns the branches on the remote.
    #[must_use]
    pub fn remote_branches(&self) -> Vec<String> {
        self.state().remote.iter().cloned().collect()
    }

    /// Returns the tags created so far.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.state().tags.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut MockState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the call and returns the locked state, or the configured failure.
    fn record(&self, operation: &str, args: &[&str]) -> GitResult<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        let call = if args.is_empty() {
            operation.to_string()
        } else {
            format!("{operation} {}", args.join(" "))
        };
        state.calls.push(call.clone());

        if state.fail_on.contains(operation) {
            return Err(GitError::command_failed(call, "mock failure"));
        }
        Ok(state)
    }
}

impl Repository for MockRepository {
    fn local_path(&self) -> &Path {
        &self.path
    }

    fn remote_name(&self) -> &str {
        &self.remote
    }

    fn is_clean(&self) -> GitResult<()> {
        let state = self.record("is_clean", &[])?;
        if state.dirty.is_empty() {
            Ok(())
        } else {
            Err(GitError::DirtyWorkingTree(state.dirty.clone()))
        }
    }

    fn fetch(&self) -> GitResult<()> {
        self.record("fetch", &[])?;
        Ok(())
    }

    fn current_branch(&self) -> GitResult<Option<String>> {
        let state = self.record("current_branch", &[])?;
        Ok(state.current.clone())
    }

    fn has_branch(&self, matcher: &BranchMatch) -> GitResult<BranchLookup> {
        let state = self.record("has_branch", &[])?;
        Ok(BranchLookup {
            local: state
                .local
                .iter()
                .filter(|name| matcher.matches(name))
                .cloned()
                .collect(),
            remote: state
                .remote
                .iter()
                .filter(|name| matcher.matches(name))
                .cloned()
                .collect(),
        })
    }

    fn checkout_branch(&self, name: &str) -> GitResult<()> {
        let mut state = self.record("checkout_branch", &[name])?;
        if !state.local.contains(name) {
            if !state.remote.contains(name) {
                return Err(GitError::command_failed(
                    format!("git checkout {name}"),
                    "no such branch",
                ));
            }
            state.local.insert(name.to_string());
        }
        state.current = Some(name.to_string());
        Ok(())
    }

    fn create_branch(&self, name: &str) -> GitResult<()> {
        let mut state = self.record("create_branch", &[name])?;
        if !state.local.insert(name.to_string()) {
            return Err(GitError::command_failed(
                format!("git checkout -b {name}"),
                "branch already exists",
            ));
        }
        state.current = Some(name.to_string());
        Ok(())
    }

    fn merge_branch(&self, name: &str, mode: MergeMode) -> GitResult<()> {
        let state = self.record("merge_branch", &[name, mode.flag()])?;
        if state.conflicts.is_empty() {
            Ok(())
        } else {
            Err(GitError::command_failed(
                format!("git merge {} --no-edit {name}", mode.flag()),
                "Automatic merge failed; fix conflicts and then commit the result.",
            ))
        }
    }

    fn merge_conflicts(&self) -> GitResult<BTreeMap<String, String>> {
        let state = self.record("merge_conflicts", &[])?;
        Ok(state.conflicts.clone())
    }

    fn checkout_file(&self, path: &str, side: Side) -> GitResult<()> {
        let side = side.to_string();
        self.record("checkout_file", &[path, &side])?;
        Ok(())
    }

    fn continue_merge(&self) -> GitResult<()> {
        let mut state = self.record("continue_merge", &[])?;
        state.conflicts.clear();
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> GitResult<()> {
        let mut state = self.record("delete_branch", &[name])?;
        state.local.remove(name);
        Ok(())
    }

    fn add_file(&self, path: &str) -> GitResult<()> {
        self.record("add_file", &[path])?;
        Ok(())
    }

    fn commit_changes(&self, message: &str) -> GitResult<()> {
        let mut state = self.record("commit_changes", &[message])?;
        state.dirty.clear();
        Ok(())
    }

    fn tag_commit(&self, tag: &str, message: &str) -> GitResult<()> {
        let mut state = self.record("tag_commit", &[tag, message])?;
        if state.tags.iter().any(|existing| existing == tag) {
            return Err(GitError::command_failed(
                format!("git tag {tag}"),
                "tag already exists",
            ));
        }
        state.tags.push(tag.to_string());
        Ok(())
    }

    fn push_all_changes(&self) -> GitResult<()> {
        let mut state = self.record("push_all_changes", &[])?;
        let local = state.local.clone();
        state.remote.extend(local);
        Ok(())
    }

    fn push_all_tags(&self) -> GitResult<()> {
        self.record("push_all_tags", &[])?;
        Ok(())
    }

    fn push_deletion(&self, name: &str) -> GitResult<()> {
        let mut state = self.record("push_deletion", &[name])?;
        state.remote.remove(name);
        Ok(())
    }

    fn file_at(&self, branch: &str, path: &str) -> GitResult<Option<Vec<u8>>> {
        let state = self.record("file_at", &[branch, path])?;
        Ok(state
            .files
            .get(&(branch.to_string(), path.to_string()))
            .cloned())
    }

    fn undo_all_changes(&self, production: &str) -> GitResult<()> {
        let mut state = self.record("undo_all_changes", &[production])?;
        state.local.retain(|name| name == production);
        state.current = Some(production.to_string());
        state.dirty.clear();
        state.conflicts.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls() {
        let repo = MockRepository::new("/tmp/project").with_local_branch("main");
        repo.fetch().unwrap();
        repo.checkout_branch("main").unwrap();

        assert_eq!(repo.calls(), vec!["fetch", "checkout_branch main"]);
        assert!(repo.called("fetch"));
        assert!(!repo.called("push_all_changes"));
    }

    #[test]
    fn test_fail_on() {
        let repo = MockRepository::new("/tmp/project").fail_on("push_all_changes");
        let err = repo.push_all_changes().unwrap_err();
        assert!(matches!(err, GitError::CommandFailed { .. }));
        assert!(repo.called("push_all_changes"));
    }

    #[test]
    fn test_branch_lifecycle() {
        let repo = MockRepository::new("/tmp/project")
            .with_local_branch("main")
            .with_remote_branch("main");

        repo.create_branch("release/1.1.0").unwrap();
        assert_eq!(
            repo.current_branch().unwrap(),
            Some("release/1.1.0".to_string())
        );
        assert!(repo.create_branch("release/1.1.0").is_err());

        repo.push_all_changes().unwrap();
        assert!(repo.remote_branches().contains(&"release/1.1.0".to_string()));

        repo.delete_branch("release/1.1.0").unwrap();
        repo.push_deletion("release/1.1.0").unwrap();
        assert_eq!(repo.local_branches(), vec!["main".to_string()]);
        assert_eq!(repo.remote_branches(), vec!["main".to_string()]);
    }

    #[test]
    fn test_checkout_remote_only_branch_tracks_it() {
        let repo = MockRepository::new("/tmp/project").with_remote_branch("develop");
        repo.checkout_branch("develop").unwrap();
        assert_eq!(repo.local_branches(), vec!["develop".to_string()]);
        assert!(repo.checkout_branch("missing").is_err());
    }

    #[test]
    fn test_conflicts_until_continue() {
        let repo = MockRepository::new("/tmp/project").with_conflicts(&[("VERSION", "UU")]);
        assert!(repo.merge_branch("release/1.1.0", MergeMode::NoFastForward).is_err());
        assert_eq!(repo.merge_conflicts().unwrap().len(), 1);

        repo.continue_merge().unwrap();
        assert!(repo.merge_conflicts().unwrap().is_empty());
        assert!(repo.merge_branch("release/1.1.0", MergeMode::NoFastForward).is_ok());
    }

    #[test]
    fn test_dirty_until_commit() {
        let repo = MockRepository::new("/tmp/project").with_dirty("VERSION");
        assert!(matches!(
            repo.is_clean(),
            Err(GitError::DirtyWorkingTree(paths)) if paths == vec!["VERSION".to_string()]
        ));
        repo.commit_changes("Set next hotfix version.").unwrap();
        assert!(repo.is_clean().is_ok());
    }

    #[test]
    fn test_has_branch_filters() {
        let repo = MockRepository::new("/tmp/project")
            .with_local_branch("main")
            .with_remote_branch("release/1.1.0")
            .with_remote_branch("hotfix/1.0.1");

        let lookup = repo
            .has_branch(&BranchMatch::Prefix("release/".to_string()))
            .unwrap();
        assert!(lookup.local.is_empty());
        assert_eq!(lookup.remote, vec!["release/1.1.0".to_string()]);
    }

    #[test]
    fn test_undo_keeps_production_only() {
        let repo = MockRepository::new("/tmp/project")
            .with_local_branch("main")
            .with_local_branch("develop")
            .with_local_branch("release/1.1.0")
            .with_dirty("VERSION");

        repo.undo_all_changes("main").unwrap();
        assert_eq!(repo.local_branches(), vec!["main".to_string()]);
        assert_eq!(repo.current_branch().unwrap(), Some("main".to_string()));
        assert!(repo.is_clean().is_ok());
    }

    #[test]
    fn test_file_at() {
        let repo =
            MockRepository::new("/tmp/project").with_file_at("main", "VERSION", b"1.0.1\n");
        assert_eq!(
            repo.file_at("main", "VERSION").unwrap(),
            Some(b"1.0.1\n".to_vec())
        );
        assert_eq!(repo.file_at("develop", "VERSION").unwrap(), None);
    }
}

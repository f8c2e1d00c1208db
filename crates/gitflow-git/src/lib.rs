//! Repository contract and git adapter for Gitflow.
//!
//! This crate provides:
//! - [`Repository`]: The operations the workflow engine needs from version control
//! - [`GitRepository`]: The adapter backed by `git2` and the system `git` binary
//! - [`MockRepository`]: A recording test double

mod command;
mod error;
pub mod mock;
mod repository;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

pub use error::{GitError, GitResult};
pub use gitflow_version::BranchMatch;
pub use mock::MockRepository;
pub use repository::{GitRepository, conflict_marker};

/// How a branch is merged into the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Stage the combined changes without committing.
    Squash,
    /// Always create a merge commit.
    NoFastForward,
    /// Refuse unless the merge is a fast-forward.
    FastForwardOnly,
}

impl MergeMode {
    /// Returns the `git merge` flag for this mode.
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            Self::Squash => "--squash",
            Self::NoFastForward => "--no-ff",
            Self::FastForwardOnly => "--ff-only",
        }
    }
}

/// Which side of a conflicted merge to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The branch being merged into.
    Ours,
    /// The branch being merged.
    Theirs,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ours => write!(f, "ours"),
            Self::Theirs => write!(f, "theirs"),
        }
    }
}

/// Branches matching a [`BranchMatch`], split by where they live.
///
/// Both lists hold short branch names (`release/1.2.0`); remote entries have
/// the remote name stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchLookup {
    /// Matching local branches.
    pub local: Vec<String>,
    /// Matching branches on the configured remote.
    pub remote: Vec<String>,
}

impl BranchLookup {
    /// Returns true if any local or remote branch matched.
    #[must_use]
    pub fn found(&self) -> bool {
        !self.local.is_empty() || !self.remote.is_empty()
    }

    /// Returns the distinct branch names across local and remote.
    #[must_use]
    pub fn names(&self) -> BTreeSet<&str> {
        self.local
            .iter()
            .chain(&self.remote)
            .map(String::as_str)
            .collect()
    }

    /// Returns every matching ref, remote ones prefixed with the remote name.
    #[must_use]
    pub fn refs(&self, remote: &str) -> Vec<String> {
        self.local
            .iter()
            .cloned()
            .chain(self.remote.iter().map(|name| format!("{remote}/{name}")))
            .collect()
    }
}

/// Operations the workflow engine needs from version control.
///
/// Implementations hold no cached state: every call is a fresh query or
/// mutation against the working copy rooted at [`Repository::local_path`].
pub trait Repository: Send + Sync {
    /// Returns the working copy root.
    fn local_path(&self) -> &Path;

    /// Returns the name of the single configured remote.
    fn remote_name(&self) -> &str;

    /// Succeeds only if there are no uncommitted or untracked changes.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::DirtyWorkingTree`] listing the changed paths.
    fn is_clean(&self) -> GitResult<()>;

    /// Updates remote-tracking refs, pruning deleted branches.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails.
    fn fetch(&self) -> GitResult<()>;

    /// Returns the checked out branch, or `None` when HEAD is detached or unborn.
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD cannot be read.
    fn current_branch(&self) -> GitResult<Option<String>>;

    /// Finds local and remote branches matching the given pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if refs cannot be listed.
    fn has_branch(&self, matcher: &BranchMatch) -> GitResult<BranchLookup>;

    /// Checks out an existing branch, creating a tracking branch for a
    /// remote-only one.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout fails.
    fn checkout_branch(&self, name: &str) -> GitResult<()>;

    /// Creates a branch at HEAD and checks it out.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch exists or cannot be created.
    fn create_branch(&self, name: &str) -> GitResult<()>;

    /// Merges the named branch into the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the merge stops, including on conflicts.
    fn merge_branch(&self, name: &str, mode: MergeMode) -> GitResult<()>;

    /// Returns conflicted paths mapped to their two-letter status marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read.
    fn merge_conflicts(&self) -> GitResult<BTreeMap<String, String>>;

    /// Replaces a conflicted path in the working tree with one side's content.
    /// The path still has to be staged with [`Repository::add_file`].
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be checked out.
    fn checkout_file(&self, path: &str, side: Side) -> GitResult<()>;

    /// Concludes an in-progress merge with its prepared message.
    ///
    /// # Errors
    ///
    /// Returns an error if unresolved conflicts remain.
    fn continue_merge(&self) -> GitResult<()>;

    /// Force-deletes a local branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch cannot be deleted.
    fn delete_branch(&self, name: &str) -> GitResult<()>;

    /// Stages a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be staged.
    fn add_file(&self, path: &str) -> GitResult<()>;

    /// Stages every change and commits it.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    fn commit_changes(&self, message: &str) -> GitResult<()>;

    /// Creates an annotated tag on HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag exists or cannot be created.
    fn tag_commit(&self, tag: &str, message: &str) -> GitResult<()>;

    /// Pushes every local branch to the remote.
    ///
    /// # Errors
    ///
    /// Returns an error if the push is rejected.
    fn push_all_changes(&self) -> GitResult<()>;

    /// Pushes every tag to the remote.
    ///
    /// # Errors
    ///
    /// Returns an error if the push is rejected.
    fn push_all_tags(&self) -> GitResult<()>;

    /// Deletes a branch on the remote.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion is rejected.
    fn push_deletion(&self, name: &str) -> GitResult<()>;

    /// Returns a file's content on a branch, or `None` if the branch or the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the object database cannot be read.
    fn file_at(&self, branch: &str, path: &str) -> GitResult<Option<Vec<u8>>>;

    /// Discards all local work: fetches, force-checks-out `production`,
    /// hard-resets it to the remote, removes untracked files and force-deletes
    /// every other local branch.
    ///
    /// # Errors
    ///
    /// Returns the first failing step.
    fn undo_all_changes(&self, production: &str) -> GitResult<()>;
}

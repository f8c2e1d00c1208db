//! Core error types.

use std::path::PathBuf;

use gitflow_version::BranchKind;
use thiserror::Error;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A release or hotfix branch already exists, or more than one does.
    #[error("{kind} branch already exists: {}", branches.join(", "))]
    BranchConflict {
        kind: BranchKind,
        branches: Vec<String>,
    },

    /// A required branch does not exist.
    #[error("missing branch: {0}")]
    MissingBranch(String),

    /// The operation makes no sense for the branch kind or arguments.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The project directory does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(PathBuf),

    /// A merge stopped on conflicts that are not auto-resolvable.
    #[error("unresolved merge conflicts: {}", .0.join(", "))]
    UnresolvedConflicts(Vec<String>),

    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] gitflow_git::GitError),

    /// Plugin error.
    #[error("plugin error: {0}")]
    Plugin(#[from] gitflow_plugin::PluginError),

    /// Version error.
    #[error("version error: {0}")]
    Version(#[from] gitflow_version::VersionError),

    /// The workflow failed and undoing its changes failed as well.
    #[error("{cause}; rollback failed: {undo}")]
    RollbackFailed {
        cause: Box<CoreError>,
        undo: gitflow_git::GitError,
    },
}

impl CoreError {
    /// Returns the error that made the workflow fail, looking through a
    /// failed rollback.
    #[must_use]
    pub fn cause(&self) -> &CoreError {
        match self {
            Self::RollbackFailed { cause, .. } => cause.cause(),
            other => other,
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

//! Git error types.

use std::path::PathBuf;

use thiserror::Error;

/// Git-related errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository.
    #[error("not a git repository: {0}")]
    NotARepo(PathBuf),

    /// A git subprocess exited unsuccessfully.
    #[error("`{command}` failed: {output}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Captured stderr, falling back to stdout.
        output: String,
    },

    /// The working tree has uncommitted or untracked changes.
    #[error("working tree is not clean: {}", .0.join(", "))]
    DirtyWorkingTree(Vec<String>),

    /// Git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// Creates a command failure from a command line and its output.
    pub fn command_failed(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            output: output.into(),
        }
    }
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;

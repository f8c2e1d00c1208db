//! Plugin error types.

use std::path::PathBuf;

use gitflow_git::GitError;
use gitflow_version::VersionError;
use thiserror::Error;

/// Plugin-related errors.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A required external tool is not on `PATH`.
    #[error("required tool not found: {0}")]
    ToolUnavailable(String),

    /// Version file not found.
    #[error("version file not found: {0}")]
    FileNotFound(PathBuf),

    /// Version file could not be parsed.
    #[error("failed to parse {file}: {reason}")]
    Parse { file: String, reason: String },

    /// Version field not found in the file.
    #[error("version not found in {0}")]
    VersionNotFound(String),

    /// An external tool exited unsuccessfully.
    #[error("`{command}` failed: {output}")]
    CommandFailed { command: String, output: String },

    /// The stored version string is malformed.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// A repository operation failed inside a hook.
    #[error(transparent)]
    Git(#[from] GitError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

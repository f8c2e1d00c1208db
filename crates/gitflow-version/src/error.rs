//! Version error types.

use thiserror::Error;

/// Errors produced by the version and branch model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The string does not have the `major.minor.patch[-qualifier]` shape.
    #[error("invalid version string: {0:?}")]
    InvalidVersionString(String),

    /// A numeric component does not fit into 64 bits after incrementing.
    #[error("version component overflow in {0}")]
    Overflow(String),

    /// Unknown branch kind name.
    #[error("unsupported branch kind: {0}")]
    UnsupportedBranchKind(String),
}

/// Result type for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

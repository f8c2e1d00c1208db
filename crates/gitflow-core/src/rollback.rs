//! Recovery after a workflow failed midway.

use gitflow_git::Repository;
use tracing::{error, warn};

use crate::{CoreError, CoreResult};

/// Undoes local changes when a workflow step fails after the working copy
/// was touched.
///
/// When disabled, failures pass through untouched. When enabled, the
/// working copy is reset to the remote production branch and every other
/// local branch is dropped. The original error always survives: it is
/// returned as is, or wrapped in [`CoreError::RollbackFailed`] when the
/// reset fails as well.
pub struct Rollback<'a> {
    repository: &'a dyn Repository,
    production: &'a str,
    enabled: bool,
}

impl<'a> Rollback<'a> {
    /// Creates a coordinator for `repository`.
    #[must_use]
    pub fn new(repository: &'a dyn Repository, production: &'a str, enabled: bool) -> Self {
        Self {
            repository,
            production,
            enabled,
        }
    }

    /// Runs mutating steps, recovering if any of them fails.
    ///
    /// # Errors
    ///
    /// Returns the step's error, or [`CoreError::RollbackFailed`] if
    /// recovery failed too.
    pub fn guard<T>(&self, steps: impl FnOnce() -> CoreResult<T>) -> CoreResult<T> {
        steps().map_err(|cause| self.recover(cause))
    }

    /// Undoes local changes after `cause` and returns the error to report.
    #[must_use]
    pub fn recover(&self, cause: CoreError) -> CoreError {
        if !self.enabled {
            return cause;
        }

        warn!(error = %cause, branch = self.production, "undoing local changes");
        match self.repository.undo_all_changes(self.production) {
            Ok(()) => cause,
            Err(undo) => {
                error!(error = %undo, "undo failed");
                CoreError::RollbackFailed {
                    cause: Box::new(cause),
                    undo,
                }
            }
        }
    }
}

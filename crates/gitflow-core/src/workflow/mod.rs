//! Release and hotfix state machines.
//!
//! Each workflow fetches, validates without touching the working copy, then
//! runs its mutating steps under a [`Rollback`] guard.

pub(crate) mod hotfix;
pub(crate) mod release;

use gitflow_config::Config;
use gitflow_git::{MergeMode, Repository, Side};
use gitflow_plugin::{HookContext, HookRegistry, HookType, VersionPlugin};
use gitflow_version::{BranchKind, BranchNames, Version};
use tracing::debug;

use crate::{CoreError, CoreResult, Rollback};

/// Everything a workflow run needs.
pub(crate) struct Workflow<'a> {
    pub(crate) repository: &'a dyn Repository,
    pub(crate) plugin: &'a dyn VersionPlugin,
    pub(crate) hooks: &'a HookRegistry,
    pub(crate) config: &'a Config,
}

impl Workflow<'_> {
    fn branches(&self) -> &BranchNames {
        &self.config.branches
    }

    fn rollback(&self) -> Rollback<'_> {
        Rollback::new(
            self.repository,
            &self.config.branches.production,
            self.config.repository.undo,
        )
    }

    fn run_hook(&self, hook: HookType) -> CoreResult<()> {
        let ctx = HookContext::new(self.repository, self.plugin, self.branches());
        self.hooks.execute(hook, &ctx)?;
        Ok(())
    }

    fn read_version(&self) -> CoreResult<Version> {
        Ok(self.plugin.read_version(self.repository)?)
    }

    /// Writes `version` and commits it, unless it is already the current one.
    fn write_and_commit(&self, version: &Version, message: &str) -> CoreResult<()> {
        if self
            .read_version()
            .is_ok_and(|current| current == *version)
        {
            debug!(%version, "version unchanged, nothing to commit");
            return Ok(());
        }
        self.plugin.write_version(self.repository, version)?;
        self.repository.commit_changes(message)?;
        debug!(%version, message, "committed version");
        Ok(())
    }

    /// Fails with [`CoreError::BranchConflict`] if a branch of `kind` exists
    /// locally or on the remote.
    fn ensure_absent(&self, kind: BranchKind) -> CoreResult<()> {
        let lookup = self
            .repository
            .has_branch(&self.branches().matcher(kind))?;
        if lookup.found() {
            return Err(CoreError::BranchConflict {
                kind,
                branches: lookup.refs(self.repository.remote_name()),
            });
        }
        Ok(())
    }

    /// Fails with [`CoreError::MissingBranch`] unless the permanent branch
    /// of `kind` exists locally or on the remote.
    fn require(&self, kind: BranchKind) -> CoreResult<()> {
        let name = self.branches().name(kind);
        let lookup = self
            .repository
            .has_branch(&self.branches().matcher(kind))?;
        if lookup.found() {
            Ok(())
        } else {
            Err(CoreError::MissingBranch(name.to_string()))
        }
    }

    /// Returns the single branch of `kind` on the remote.
    fn find_unique(&self, kind: BranchKind) -> CoreResult<String> {
        let lookup = self
            .repository
            .has_branch(&self.branches().matcher(kind))?;
        match lookup.remote.as_slice() {
            [branch] => Ok(branch.clone()),
            [] => Err(CoreError::MissingBranch(format!(
                "{}/*",
                self.branches().name(kind)
            ))),
            branches => Err(CoreError::BranchConflict {
                kind,
                branches: branches.to_vec(),
            }),
        }
    }

    /// Merges `branch` into the current branch with a merge commit.
    ///
    /// A conflict limited to the plugin's version file is resolved by taking
    /// `side`; any other conflict is left for rollback.
    fn merge(&self, branch: &str, side: Side) -> CoreResult<()> {
        let Err(merge_error) = self
            .repository
            .merge_branch(branch, MergeMode::NoFastForward)
        else {
            return Ok(());
        };

        let conflicts = self.repository.merge_conflicts()?;
        if conflicts.is_empty() {
            return Err(merge_error.into());
        }

        let version_file = self.plugin.version_file(self.repository.local_path());
        match version_file {
            Some(file) if conflicts.len() == 1 && conflicts.contains_key(file) => {
                debug!(branch, file, %side, "resolving version file conflict");
                self.repository.checkout_file(file, side)?;
                self.repository.add_file(file)?;
                self.repository.continue_merge()?;
                Ok(())
            }
            _ => Err(CoreError::UnresolvedConflicts(
                conflicts.into_keys().collect(),
            )),
        }
    }
}

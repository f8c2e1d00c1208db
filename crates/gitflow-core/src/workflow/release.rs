//! Release branch workflows.

use gitflow_git::Side;
use gitflow_plugin::HookType;
use gitflow_version::{BranchKind, Increment};
use tracing::{debug, info};

use super::Workflow;
use crate::{CoreError, CoreResult};

/// Cuts a release branch from development.
///
/// Ends on the production branch with the new release branch pushed.
pub(crate) fn start(wf: &Workflow<'_>, increment: Increment) -> CoreResult<()> {
    let bump_message = match increment {
        Increment::None => None,
        Increment::Major => Some("Set next major project version."),
        Increment::Minor => Some("Set next minor project version."),
        Increment::Patch => {
            return Err(CoreError::UnsupportedOperation(
                "a release cannot start with a patch increment".to_string(),
            ));
        }
    };

    let repo = wf.repository;
    repo.fetch()?;
    wf.ensure_absent(BranchKind::Release)?;
    wf.require(BranchKind::Development)?;
    wf.require(BranchKind::Production)?;

    let branches = wf.branches();
    wf.rollback().guard(|| {
        repo.checkout_branch(&branches.development)?;
        wf.run_hook(HookType::BeforeReleaseStart)?;

        let mut current = wf.read_version()?;
        debug!(version = %current, "read development version");

        if let Some(message) = bump_message {
            current = current
                .next(increment)?
                .with_qualifier(wf.plugin.snapshot_qualifier());
            wf.write_and_commit(&current, message)?;
        }

        let release = current.without_qualifier();
        let branch = release.branch_name(&branches.release);
        repo.create_branch(&branch)?;
        wf.write_and_commit(&release, "Remove qualifier from project version.")?;

        wf.run_hook(HookType::AfterUpdateProjectVersion)?;
        if repo.is_clean().is_err() {
            repo.commit_changes("Update project dependencies with corresponding releases.")?;
        }

        repo.checkout_branch(&branches.production)?;
        repo.push_all_changes()?;

        info!(%branch, version = %release, "release branch created");
        Ok(())
    })
}

/// Merges the release branch into production and development, tags it and
/// removes it.
///
/// Ends on the development branch.
pub(crate) fn finish(wf: &Workflow<'_>) -> CoreResult<()> {
    let repo = wf.repository;
    repo.fetch()?;
    let branch = wf.find_unique(BranchKind::Release)?;
    wf.require(BranchKind::Development)?;
    wf.require(BranchKind::Production)?;

    let branches = wf.branches();
    wf.rollback().guard(|| {
        repo.checkout_branch(&branch)?;
        repo.checkout_branch(&branches.production)?;
        wf.merge(&branch, Side::Theirs)?;

        let version = wf.read_version()?;
        let tag = wf.config.version.tag(&version);
        repo.tag_commit(&tag, &format!("Release {version}"))?;
        debug!(%tag, "tagged release");

        repo.checkout_branch(&branches.development)?;
        wf.merge(&branch, Side::Theirs)?;

        let next = wf
            .read_version()?
            .next(Increment::Minor)?
            .with_qualifier(wf.plugin.snapshot_qualifier());
        wf.write_and_commit(&next, "Set next minor project version.")?;

        repo.delete_branch(&branch)?;
        repo.push_all_changes()?;
        repo.push_all_tags()?;
        repo.push_deletion(&branch)?;

        info!(%branch, %tag, next = %next, "release finished");
        Ok(())
    })
}

//! Hotfix branch workflows.

use gitflow_git::Side;
use gitflow_plugin::HookType;
use gitflow_version::{BranchKind, Increment};
use tracing::{debug, info};

use super::Workflow;
use crate::CoreResult;

/// Branches a patch release off production.
///
/// Ends on the new hotfix branch.
pub(crate) fn start(wf: &Workflow<'_>) -> CoreResult<()> {
    let repo = wf.repository;
    repo.fetch()?;
    wf.ensure_absent(BranchKind::Hotfix)?;
    wf.require(BranchKind::Production)?;

    let branches = wf.branches();
    wf.rollback().guard(|| {
        repo.checkout_branch(&branches.production)?;
        wf.run_hook(HookType::BeforeHotfixStart)?;

        let current = wf.read_version()?;
        let next = current.next(Increment::Patch)?.without_qualifier();
        debug!(current = %current, next = %next, "computed hotfix version");

        let branch = next.branch_name(&branches.hotfix);
        repo.create_branch(&branch)?;
        wf.write_and_commit(&next, "Set next hotfix version.")?;
        repo.push_all_changes()?;

        info!(%branch, version = %next, "hotfix branch created");
        Ok(())
    })
}

/// Merges the hotfix branch into production and development, tags it and
/// removes it.
///
/// Ends on the development branch.
pub(crate) fn finish(wf: &Workflow<'_>) -> CoreResult<()> {
    let repo = wf.repository;
    repo.fetch()?;
    let branch = wf.find_unique(BranchKind::Hotfix)?;
    wf.require(BranchKind::Development)?;
    wf.require(BranchKind::Production)?;

    let branches = wf.branches();
    wf.rollback().guard(|| {
        repo.checkout_branch(&branch)?;
        repo.checkout_branch(&branches.production)?;
        wf.merge(&branch, Side::Theirs)?;

        let version = wf.read_version()?;
        let tag = wf.config.version.tag(&version);
        repo.tag_commit(&tag, &format!("Hotfix {version}"))?;
        debug!(%tag, "tagged hotfix");

        // Development keeps its own version; the hook below moves it on when
        // the hotfix version came through unchanged.
        repo.checkout_branch(&branches.development)?;
        wf.merge(&branch, Side::Ours)?;
        wf.run_hook(HookType::AfterMergeIntoDevelopment)?;

        repo.delete_branch(&branch)?;
        repo.push_all_changes()?;
        repo.push_all_tags()?;
        repo.push_deletion(&branch)?;

        info!(%branch, %tag, "hotfix finished");
        Ok(())
    })
}

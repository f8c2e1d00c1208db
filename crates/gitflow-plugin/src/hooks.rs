//! Workflow hook points.
//!
//! Plugins bind callbacks to a fixed set of [`HookType`]s. The engine runs
//! whatever the selected plugin bound; a missing binding does nothing.

use std::collections::HashMap;
use std::fmt;

use gitflow_git::Repository;
use gitflow_version::{BranchNames, Increment};
use tracing::debug;

use crate::{PluginResult, VersionPlugin};

/// Fixed points inside the workflows where plugins may intervene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookType {
    /// Release start, after checking out the development branch.
    BeforeReleaseStart,
    /// Release start, after the qualifier was removed and committed.
    AfterUpdateProjectVersion,
    /// Hotfix start, after checking out the production branch.
    BeforeHotfixStart,
    /// Hotfix finish, after merging into the development branch.
    AfterMergeIntoDevelopment,
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeReleaseStart => write!(f, "before-release-start"),
            Self::AfterUpdateProjectVersion => write!(f, "after-update-project-version"),
            Self::BeforeHotfixStart => write!(f, "before-hotfix-start"),
            Self::AfterMergeIntoDevelopment => write!(f, "after-merge-into-development"),
        }
    }
}

/// What a hook callback gets to work with.
pub struct HookContext<'a> {
    /// The repository the workflow runs against.
    pub repository: &'a dyn Repository,
    /// The plugin selected for the project.
    pub plugin: &'a dyn VersionPlugin,
    /// Configured branch names.
    pub branches: &'a BranchNames,
}

impl<'a> HookContext<'a> {
    /// Creates a hook context.
    #[must_use]
    pub fn new(
        repository: &'a dyn Repository,
        plugin: &'a dyn VersionPlugin,
        branches: &'a BranchNames,
    ) -> Self {
        Self {
            repository,
            plugin,
            branches,
        }
    }
}

/// A bound hook callback.
pub type HookFn = Box<dyn Fn(&HookContext<'_>) -> PluginResult<()> + Send + Sync>;

/// Hook callbacks keyed by hook point and plugin name.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<(HookType, String), HookFn>,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a callback, replacing any previous binding for the same key.
    pub fn bind<F>(&mut self, hook: HookType, plugin: &str, callback: F)
    where
        F: Fn(&HookContext<'_>) -> PluginResult<()> + Send + Sync + 'static,
    {
        self.hooks
            .insert((hook, plugin.to_string()), Box::new(callback));
    }

    /// Returns true if the plugin bound a callback to the hook.
    #[must_use]
    pub fn is_bound(&self, hook: HookType, plugin: &str) -> bool {
        self.hooks.contains_key(&(hook, plugin.to_string()))
    }

    /// Runs the context plugin's callback for `hook`, if any.
    ///
    /// # Errors
    ///
    /// Propagates the callback's error.
    pub fn execute(&self, hook: HookType, ctx: &HookContext<'_>) -> PluginResult<()> {
        let plugin = ctx.plugin.name();
        match self.hooks.get(&(hook, plugin.to_string())) {
            Some(callback) => {
                debug!(%hook, plugin, "running hook");
                callback(ctx)
            }
            None => Ok(()),
        }
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self
            .hooks
            .keys()
            .map(|(hook, plugin)| format!("{plugin}:{hook}"))
            .collect();
        keys.sort();
        f.debug_struct("HookRegistry").field("hooks", &keys).finish()
    }
}

/// Standard after-merge-into-development hook.
///
/// A hotfix merged into a development branch that never moved past the
/// production version leaves both branches with the same version file. In
/// that case development is moved to the next minor snapshot and committed;
/// otherwise it is left alone.
///
/// # Errors
///
/// Returns an error if the version files cannot be compared, or the new
/// version cannot be written or committed.
pub fn sync_development_version(ctx: &HookContext<'_>) -> PluginResult<()> {
    let Some(file) = ctx.plugin.version_file(ctx.repository.local_path()) else {
        return Ok(());
    };

    let production = ctx.repository.file_at(&ctx.branches.production, file)?;
    let development = ctx.repository.file_at(&ctx.branches.development, file)?;

    if production.is_none() || production != development {
        debug!(file, "development version already diverged");
        return Ok(());
    }

    let current = ctx.plugin.read_version(ctx.repository)?;
    let next = current
        .next(Increment::Minor)?
        .with_qualifier(ctx.plugin.snapshot_qualifier());

    ctx.plugin.write_version(ctx.repository, &next)?;
    ctx.repository
        .commit_changes("Set next minor project version.")?;

    debug!(version = %next, "development version moved past hotfix");
    Ok(())
}

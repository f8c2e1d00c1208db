//! Workflow entry points.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gitflow_config::Config;
use gitflow_git::{GitRepository, Repository};
use gitflow_plugin::{VersionPlugin, ensure_tools};
use gitflow_version::{BranchKind, Increment};
use tracing::{error, info};

use crate::workflow::{Workflow, hotfix, release};
use crate::{CoreError, CoreResult, PluginRegistry};

/// The half of a temporary branch's life a workflow handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create the branch, optionally bumping the version first.
    Start(Increment),
    /// Merge, tag and remove the branch.
    Finish,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start(_) => write!(f, "start"),
            Self::Finish => write!(f, "finish"),
        }
    }
}

/// Runs Gitflow workflows.
///
/// Registration and every workflow run share one lock, so at most one
/// workflow touches a working copy at a time per engine.
pub struct Gitflow {
    registry: Mutex<PluginRegistry>,
    config: Config,
}

impl Gitflow {
    /// Creates an engine from a plugin registry and configuration.
    #[must_use]
    pub fn new(registry: PluginRegistry, config: Config) -> Self {
        Self {
            registry: Mutex::new(registry),
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers a plugin with the lowest priority so far.
    pub fn register(&self, plugin: Arc<dyn VersionPlugin>) {
        self.lock().register(plugin);
    }

    /// Returns registered plugin names in priority order.
    #[must_use]
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.lock().names()
    }

    /// Returns the fallback plugin's name.
    #[must_use]
    pub fn fallback_name(&self) -> &'static str {
        self.lock().fallback().name()
    }

    /// Returns the name of the plugin that would handle `project`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ProjectNotFound`] if `project` is not a directory.
    pub fn detect(&self, project: &Path) -> CoreResult<&'static str> {
        let registry = self.lock();
        ensure_project(project)?;
        Ok(registry.select(project).name())
    }

    /// Starts a release or hotfix in the repository at `project`.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or any workflow step fails.
    pub fn start(&self, kind: BranchKind, project: &Path, increment: Increment) -> CoreResult<()> {
        self.run_at(kind, Operation::Start(increment), project)
    }

    /// Finishes the release or hotfix in the repository at `project`.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or any workflow step fails.
    pub fn finish(&self, kind: BranchKind, project: &Path) -> CoreResult<()> {
        self.run_at(kind, Operation::Finish, project)
    }

    /// Starts a release or hotfix against an already opened repository.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or any workflow step fails.
    pub fn start_with(
        &self,
        kind: BranchKind,
        repository: &dyn Repository,
        increment: Increment,
    ) -> CoreResult<()> {
        let registry = self.lock();
        self.run(&registry, kind, Operation::Start(increment), repository)
    }

    /// Finishes a release or hotfix against an already opened repository.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or any workflow step fails.
    pub fn finish_with(&self, kind: BranchKind, repository: &dyn Repository) -> CoreResult<()> {
        let registry = self.lock();
        self.run(&registry, kind, Operation::Finish, repository)
    }

    fn lock(&self) -> MutexGuard<'_, PluginRegistry> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn run_at(&self, kind: BranchKind, operation: Operation, project: &Path) -> CoreResult<()> {
        let registry = self.lock();
        ensure_project(project)?;
        let repository = GitRepository::open(project, self.config.repository.remote.as_str())?;
        self.run(&registry, kind, operation, &repository)
    }

    fn run(
        &self,
        registry: &PluginRegistry,
        kind: BranchKind,
        operation: Operation,
        repository: &dyn Repository,
    ) -> CoreResult<()> {
        if !kind.is_temporary() {
            return Err(CoreError::UnsupportedOperation(format!(
                "cannot {operation} a {kind} branch"
            )));
        }

        let plugin = registry.select(repository.local_path());
        info!(
            %kind,
            %operation,
            plugin = plugin.name(),
            path = %repository.local_path().display(),
            "starting workflow"
        );

        let result = self.dispatch(registry, plugin.as_ref(), kind, operation, repository);
        match &result {
            Ok(()) => info!(%kind, %operation, "workflow completed"),
            Err(e) => error!(%kind, %operation, error = %e, "workflow failed"),
        }
        result
    }

    fn dispatch(
        &self,
        registry: &PluginRegistry,
        plugin: &dyn VersionPlugin,
        kind: BranchKind,
        operation: Operation,
        repository: &dyn Repository,
    ) -> CoreResult<()> {
        ensure_tools(&plugin.required_tools())?;
        repository.is_clean()?;

        let workflow = Workflow {
            repository,
            plugin,
            hooks: registry.hooks(),
            config: &self.config,
        };

        match (kind, operation) {
            (BranchKind::Release, Operation::Start(increment)) => {
                release::start(&workflow, increment)
            }
            (BranchKind::Release, Operation::Finish) => release::finish(&workflow),
            (BranchKind::Hotfix, Operation::Start(Increment::None)) => hotfix::start(&workflow),
            (BranchKind::Hotfix, Operation::Start(increment)) => Err(
                CoreError::UnsupportedOperation(format!(
                    "a hotfix cannot start with a {increment} increment"
                )),
            ),
            (BranchKind::Hotfix, Operation::Finish) => hotfix::finish(&workflow),
            (kind, _) => Err(CoreError::UnsupportedOperation(format!(
                "no workflow for {kind} branches"
            ))),
        }
    }
}

impl fmt::Debug for Gitflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gitflow")
            .field("registry", &*self.lock())
            .field("config", &self.config)
            .finish()
    }
}

fn ensure_project(project: &Path) -> CoreResult<()> {
    if project.is_dir() {
        Ok(())
    } else {
        Err(CoreError::ProjectNotFound(project.to_path_buf()))
    }
}

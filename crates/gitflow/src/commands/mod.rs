//! CLI commands.

pub mod hotfix;
pub mod plugins;
pub mod release;

use std::sync::Arc;

use anyhow::{Context, Result};
use gitflow_config::{Config, load_or_default};
use gitflow_core::{Gitflow, Operation, PluginRegistry};
use gitflow_version::BranchKind;
use gitflow_version_composer::ComposerPlugin;
use gitflow_version_maven::MavenPlugin;
use gitflow_version_npm::NpmPlugin;
use gitflow_version_python::PythonPlugin;
use gitflow_version_road::RoadPlugin;
use gitflow_version_text::TextPlugin;
use tracing::debug;

use crate::cli::ProjectArgs;

/// Loads the project configuration.
fn load(project: &ProjectArgs) -> Result<Config> {
    load_or_default(project.config.as_deref(), &project.path)
        .context("failed to load configuration")
}

/// Builds the engine with the bundled plugins in priority order.
pub fn engine(project: &ProjectArgs) -> Result<Gitflow> {
    let config = load(project)?;
    debug!(
        project = %project.path.display(),
        production = %config.branches.production,
        development = %config.branches.development,
        tag_prefix = %config.version.tag_prefix,
        "loaded configuration"
    );

    let registry = PluginRegistry::new(Arc::new(TextPlugin::new(
        config.plugins.text.file.clone(),
    )))
    .with_plugin(Arc::new(MavenPlugin::new(config.plugins.maven.use_releases)))
    .with_plugin(Arc::new(NpmPlugin::new()))
    .with_plugin(Arc::new(ComposerPlugin::new()))
    .with_plugin(Arc::new(PythonPlugin::new()))
    .with_plugin(Arc::new(RoadPlugin::new()));

    Ok(Gitflow::new(registry, config))
}

/// Runs one workflow and reports its outcome.
pub fn run_workflow(kind: BranchKind, operation: Operation, project: &ProjectArgs) -> Result<()> {
    let engine = engine(project)?;

    println!("Starting {kind} {operation}...");
    let result = match operation {
        Operation::Start(increment) => engine.start(kind, &project.path, increment),
        Operation::Finish => engine.finish(kind, &project.path),
    };

    match result {
        Ok(()) => {
            println!("{} {operation} completed.", title(kind));
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {operation} failed.", title(kind));
            debug!(cause = %e.cause(), "workflow aborted");
            Err(e).with_context(|| format!("{kind} {operation} failed"))
        }
    }
}

fn title(kind: BranchKind) -> &'static str {
    match kind {
        BranchKind::Production => "Production",
        BranchKind::Development => "Development",
        BranchKind::Release => "Release",
        BranchKind::Hotfix => "Hotfix",
    }
}

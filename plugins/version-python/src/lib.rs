//! Python version plugin.
//!
//! Handles `pyproject.toml` and legacy `setup.py` projects. When both exist,
//! `pyproject.toml` wins.

use std::path::PathBuf;

use gitflow_git::Repository;
use gitflow_plugin::files::{read_assignment_version, write_assignment_version};
use gitflow_plugin::{Plugin, PluginResult, VersionPlugin};
use gitflow_version::Version;

const CANDIDATES: [&str; 2] = ["pyproject.toml", "setup.py"];

/// Version plugin for Python projects.
#[derive(Debug, Default)]
pub struct PythonPlugin;

impl PythonPlugin {
    /// Creates the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn path(&self, repository: &dyn Repository) -> PathBuf {
        let root = repository.local_path();
        let file = self.version_file(root).unwrap_or(CANDIDATES[0]);
        root.join(file)
    }
}

impl Plugin for PythonPlugin {
    fn name(&self) -> &'static str {
        "python"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &'static str {
        "Manages the version in pyproject.toml or setup.py"
    }
}

impl VersionPlugin for PythonPlugin {
    fn version_files(&self) -> Vec<&str> {
        CANDIDATES.to_vec()
    }

    fn snapshot_qualifier(&self) -> &str {
        "dev"
    }

    fn read_version(&self, repository: &dyn Repository) -> PluginResult<Version> {
        read_assignment_version(&self.path(repository))
    }

    fn write_version(&self, repository: &dyn Repository, version: &Version) -> PluginResult<()> {
        write_assignment_version(&self.path(repository), version)
    }
}

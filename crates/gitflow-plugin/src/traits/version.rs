//! Version plugin trait.

use std::path::Path;

use gitflow_git::Repository;
use gitflow_version::Version;

use super::Plugin;
use crate::{HookRegistry, HookType, PluginResult, sync_development_version};

/// Reads and writes the version stamp of one kind of project.
///
/// A plugin claims a project directory when one of its
/// [`version_files`](VersionPlugin::version_files) exists there. The workflow
/// engine only talks to plugins through this trait.
pub trait VersionPlugin: Plugin {
    /// Candidate version file names relative to the project root, in
    /// priority order.
    fn version_files(&self) -> Vec<&str>;

    /// The qualifier marking in-development versions (e.g. `SNAPSHOT`).
    fn snapshot_qualifier(&self) -> &str;

    /// External tools that must be on `PATH` before a workflow runs.
    fn required_tools(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Reads the current version from the working tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the version file is missing, unreadable or holds
    /// a malformed version.
    fn read_version(&self, repository: &dyn Repository) -> PluginResult<Version>;

    /// Writes a version into the working tree without committing.
    ///
    /// # Errors
    ///
    /// Returns an error if the version file cannot be updated.
    fn write_version(&self, repository: &dyn Repository, version: &Version) -> PluginResult<()>;

    /// Binds this plugin's hooks.
    ///
    /// The default binds [`HookType::AfterMergeIntoDevelopment`] to
    /// [`sync_development_version`].
    fn register_hooks(&self, hooks: &mut HookRegistry) {
        hooks.bind(
            HookType::AfterMergeIntoDevelopment,
            self.name(),
            sync_development_version,
        );
    }

    /// Returns true if any candidate version file exists under `root`.
    fn detect(&self, root: &Path) -> bool {
        self.version_files()
            .iter()
            .any(|file| root.join(file).is_file())
    }

    /// Returns the version file in use under `root`: the first existing
    /// candidate, else the first candidate.
    fn version_file(&self, root: &Path) -> Option<&str> {
        let candidates = self.version_files();
        candidates
            .iter()
            .copied()
            .find(|file| root.join(file).is_file())
            .or_else(|| candidates.first().copied())
    }
}

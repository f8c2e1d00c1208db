//! Plain text version plugin.
//!
//! Keeps the version as the only content of a single file, `VERSION` by
//! default. Serves as the fallback when no other plugin claims a project.

use std::fs;
use std::path::PathBuf;

use gitflow_git::Repository;
use gitflow_plugin::{Plugin, PluginError, PluginResult, VersionPlugin};
use gitflow_version::Version;
use tracing::debug;

/// Default version file name.
pub const DEFAULT_FILE: &str = "VERSION";

/// Version assumed while the version file does not exist yet.
const INITIAL_VERSION: &str = "0.1.0-dev";

/// Version plugin for a plain text version file.
pub struct TextPlugin {
    file: String,
}

impl TextPlugin {
    /// Creates a plugin reading `file` relative to the project root.
    #[must_use]
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    /// Returns the version file name.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    fn path(&self, repository: &dyn Repository) -> PathBuf {
        repository.local_path().join(&self.file)
    }
}

impl Default for TextPlugin {
    fn default() -> Self {
        Self::new(DEFAULT_FILE)
    }
}

impl Plugin for TextPlugin {
    fn name(&self) -> &'static str {
        "text"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &'static str {
        "Keeps the version in a plain text file"
    }
}

impl VersionPlugin for TextPlugin {
    fn version_files(&self) -> Vec<&str> {
        vec![self.file.as_str()]
    }

    fn snapshot_qualifier(&self) -> &str {
        "dev"
    }

    fn read_version(&self, repository: &dyn Repository) -> PluginResult<Version> {
        let path = self.path(repository);
        if !path.exists() {
            debug!(path = %path.display(), version = INITIAL_VERSION, "no version file");
            return Ok(Version::parse(INITIAL_VERSION)?);
        }

        let content = fs::read_to_string(&path)?;
        let raw = content.trim();
        if raw.is_empty() {
            return Err(PluginError::VersionNotFound(path.display().to_string()));
        }
        Ok(Version::parse(raw)?)
    }

    fn write_version(&self, repository: &dyn Repository, version: &Version) -> PluginResult<()> {
        let path = self.path(repository);
        fs::write(&path, format!("{version}\n"))?;
        debug!(path = %path.display(), %version, "wrote version");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitflow_git::MockRepository;
    use gitflow_plugin::{HookRegistry, HookType};
    use tempfile::TempDir;

    fn setup() -> (TempDir, MockRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = MockRepository::new(temp_dir.path());
        (temp_dir, repo)
    }

    #[test]
    fn test_plugin_metadata() {
        let plugin = TextPlugin::default();
        assert_eq!(plugin.name(), "text");
        assert_eq!(plugin.version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(plugin.file(), "VERSION");
        assert_eq!(plugin.version_files(), vec!["VERSION"]);
        assert_eq!(plugin.snapshot_qualifier(), "dev");
        assert!(plugin.required_tools().is_empty());
    }

    #[test]
    fn test_read_version() {
        let (temp_dir, repo) = setup();
        fs::write(temp_dir.path().join("VERSION"), "  1.4.0-dev\n\n").unwrap();

        let version = TextPlugin::default().read_version(&repo).unwrap();
        assert_eq!(version.to_string(), "1.4.0-dev");
    }

    #[test]
    fn test_read_missing_file_gives_initial_version() {
        let (_temp_dir, repo) = setup();
        let version = TextPlugin::default().read_version(&repo).unwrap();
        assert_eq!(version.to_string(), "0.1.0-dev");
    }

    #[test]
    fn test_read_empty_file() {
        let (temp_dir, repo) = setup();
        fs::write(temp_dir.path().join("VERSION"), "\n").unwrap();

        let err = TextPlugin::default().read_version(&repo).unwrap_err();
        assert!(matches!(err, PluginError::VersionNotFound(_)));
    }

    #[test]
    fn test_read_malformed_version() {
        let (temp_dir, repo) = setup();
        fs::write(temp_dir.path().join("VERSION"), "v1").unwrap();

        let err = TextPlugin::default().read_version(&repo).unwrap_err();
        assert!(matches!(err, PluginError::Version(_)));
    }

    #[test]
    fn test_write_creates_file() {
        let (temp_dir, repo) = setup();
        let plugin = TextPlugin::new("version.txt");

        plugin
            .write_version(&repo, &Version::parse("2.0.0").unwrap())
            .unwrap();

        let content = fs::read_to_string(temp_dir.path().join("version.txt")).unwrap();
        assert_eq!(content, "2.0.0\n");
        assert!(plugin.detect(temp_dir.path()));
    }

    #[test]
    fn test_detect_and_version_file() {
        let (temp_dir, _repo) = setup();
        let plugin = TextPlugin::default();
        assert!(!plugin.detect(temp_dir.path()));
        assert_eq!(plugin.version_file(temp_dir.path()), Some("VERSION"));
    }

    #[test]
    fn test_registers_sync_hook() {
        let mut hooks = HookRegistry::new();
        TextPlugin::default().register_hooks(&mut hooks);
        assert!(hooks.is_bound(HookType::AfterMergeIntoDevelopment, "text"));
        assert_eq!(hooks.len(), 1);
    }
}

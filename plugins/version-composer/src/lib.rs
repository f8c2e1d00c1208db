//! Composer version plugin.

use gitflow_git::Repository;
use gitflow_plugin::files::{read_json_version, write_json_version};
use gitflow_plugin::{Plugin, PluginResult, VersionPlugin};
use gitflow_version::Version;

const COMPOSER_JSON: &str = "composer.json";

/// Version plugin for PHP projects managed by Composer.
///
/// Composer usually derives versions from tags, so a missing `"version"`
/// field is added on the first write.
#[derive(Debug, Default)]
pub struct ComposerPlugin;

impl ComposerPlugin {
    /// Creates the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for ComposerPlugin {
    fn name(&self) -> &'static str {
        "composer"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &'static str {
        "Manages the version in composer.json"
    }
}

impl VersionPlugin for ComposerPlugin {
    fn version_files(&self) -> Vec<&str> {
        vec![COMPOSER_JSON]
    }

    fn snapshot_qualifier(&self) -> &str {
        "dev"
    }

    fn read_version(&self, repository: &dyn Repository) -> PluginResult<Version> {
        read_json_version(&repository.local_path().join(COMPOSER_JSON))
    }

    fn write_version(&self, repository: &dyn Repository, version: &Version) -> PluginResult<()> {
        write_json_version(&repository.local_path().join(COMPOSER_JSON), version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitflow_git::MockRepository;
    use gitflow_plugin::PluginError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plugin_metadata() {
        let plugin = ComposerPlugin::new();
        assert_eq!(plugin.name(), "composer");
        assert_eq!(plugin.version_files(), vec!["composer.json"]);
        assert_eq!(plugin.snapshot_qualifier(), "dev");
    }

    #[test]
    fn test_read_and_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(COMPOSER_JSON);
        fs::write(
            &path,
            "{\n    \"name\": \"acme/app\",\n    \"version\": \"0.4.0-dev\"\n}\n",
        )
        .unwrap();
        let repo = MockRepository::new(temp_dir.path());
        let plugin = ComposerPlugin::new();

        assert_eq!(plugin.read_version(&repo).unwrap().to_string(), "0.4.0-dev");

        plugin
            .write_version(&repo, &Version::parse("0.4.0").unwrap())
            .unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n    \"name\": \"acme/app\",\n    \"version\": \"0.4.0\"\n}\n"
        );
    }

    #[test]
    fn test_read_without_version_field() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(COMPOSER_JSON), r#"{"name": "acme/app"}"#).unwrap();
        let repo = MockRepository::new(temp_dir.path());

        assert!(matches!(
            ComposerPlugin::new().read_version(&repo),
            Err(PluginError::VersionNotFound(_))
        ));
    }

    #[test]
    fn test_detect() {
        let temp_dir = TempDir::new().unwrap();
        let plugin = ComposerPlugin::new();
        assert!(!plugin.detect(temp_dir.path()));
        fs::write(temp_dir.path().join(COMPOSER_JSON), "{}").unwrap();
        assert!(plugin.detect(temp_dir.path()));
    }
}

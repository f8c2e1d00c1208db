//! npm version plugin.
//!
//! Keeps the `"version"` field of `package.json` and, when present, the
//! matching entries of `package-lock.json` in step.

use std::path::Path;

use gitflow_git::Repository;
use gitflow_plugin::files::{read_json, read_json_version, write_json, write_json_version};
use gitflow_plugin::{Plugin, PluginResult, VersionPlugin};
use gitflow_version::Version;
use serde_json::Value;
use tracing::debug;

const PACKAGE_JSON: &str = "package.json";
const PACKAGE_LOCK: &str = "package-lock.json";

/// Version plugin for npm packages.
#[derive(Debug, Default)]
pub struct NpmPlugin;

impl NpmPlugin {
    /// Creates the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for NpmPlugin {
    fn name(&self) -> &'static str {
        "npm"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &'static str {
        "Manages the version in package.json and package-lock.json"
    }
}

impl VersionPlugin for NpmPlugin {
    fn version_files(&self) -> Vec<&str> {
        vec![PACKAGE_JSON]
    }

    fn snapshot_qualifier(&self) -> &str {
        "dev"
    }

    fn read_version(&self, repository: &dyn Repository) -> PluginResult<Version> {
        read_json_version(&repository.local_path().join(PACKAGE_JSON))
    }

    fn write_version(&self, repository: &dyn Repository, version: &Version) -> PluginResult<()> {
        let root = repository.local_path();
        write_json_version(&root.join(PACKAGE_JSON), version)?;
        update_lockfile(root, version)
    }
}

/// Updates the root package entries of `package-lock.json`, if there is one.
fn update_lockfile(root: &Path, version: &Version) -> PluginResult<()> {
    let path = root.join(PACKAGE_LOCK);
    if !path.is_file() {
        return Ok(());
    }

    let mut lock = read_json(&path)?;
    let value = Value::String(version.to_string());

    if let Some(object) = lock.as_object_mut() {
        object.insert("version".to_string(), value.clone());
    }
    if let Some(root_package) = lock
        .get_mut("packages")
        .and_then(|packages| packages.get_mut(""))
        .and_then(Value::as_object_mut)
    {
        root_package.insert("version".to_string(), value);
    }

    write_json(&path, &lock)?;
    debug!(%version, "updated package-lock.json");
    Ok(())
}

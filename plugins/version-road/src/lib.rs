//! Road version plugin.
//!
//! Road projects describe themselves in a `road.yaml` (or `road.yml`)
//! descriptor whose top-level `version` key holds the project version.
//! Writes only touch the `version` line so comments and layout survive.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use gitflow_git::Repository;
use gitflow_plugin::{Plugin, PluginError, PluginResult, VersionPlugin};
use gitflow_version::Version;
use regex::Regex;
use serde_yaml::Value;

const CANDIDATES: [&str; 2] = ["road.yaml", "road.yml"];

static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^(version:[ \t]*)(["']?)([^"'\s#]+)(["']?)"#).expect("invalid regex")
});

/// Version plugin for road YAML descriptors.
#[derive(Debug, Default)]
pub struct RoadPlugin;

impl RoadPlugin {
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

fn load(path: &Path) -> PluginResult<(String, Value)> {
    if !path.is_file() {
        return Err(PluginError::FileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let document = serde_yaml::from_str(&content).map_err(|e| PluginError::Parse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok((content, document))
}

impl Plugin for RoadPlugin {
    fn name(&self) -> &'static str {
        "road"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &'static str {
        "Manages the version in a road.yaml descriptor"
    }
}

impl VersionPlugin for RoadPlugin {
    fn version_files(&self) -> Vec<&str> {
        CANDIDATES.to_vec()
    }

    fn snapshot_qualifier(&self) -> &str {
        "dev"
    }

    fn read_version(&self, repository: &dyn Repository) -> PluginResult<Version> {
        let path = self.path(repository);
        let (_, document) = load(&path)?;

        match document.get("version") {
            Some(Value::String(raw)) => Ok(Version::parse(raw)?),
            _ => Err(PluginError::VersionNotFound(path.display().to_string())),
        }
    }

    fn write_version(&self, repository: &dyn Repository, version: &Version) -> PluginResult<()> {
        let path = self.path(repository);
        let (content, _) = load(&path)?;
        if !VERSION_LINE.is_match(&content) {
            return Err(PluginError::VersionNotFound(path.display().to_string()));
        }

        let updated = VERSION_LINE.replace(&content, format!("${{1}}${{2}}{version}${{4}}"));
        fs::write(&path, updated.as_bytes())?;
        Ok(())
    }
}

//! Configuration schema.

use gitflow_version::{BranchNames, Version};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Branch names.
    #[serde(default)]
    pub branches: BranchNames,

    /// Remote and recovery settings.
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Version configuration.
    #[serde(default)]
    pub version: VersionConfig,

    /// Plugin-specific configuration.
    #[serde(default)]
    pub plugins: PluginsConfig,
}

impl Config {
    /// Checks values that deserialize fine but cannot drive a workflow.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> ConfigResult<()> {
        let branches = &self.branches;
        for (key, value) in [
            ("branches.production", &branches.production),
            ("branches.development", &branches.development),
            ("branches.release", &branches.release),
            ("branches.hotfix", &branches.hotfix),
            ("repository.remote", &self.repository.remote),
            ("plugins.text.file", &self.plugins.text.file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{key} must not be empty")));
            }
        }

        if branches.production == branches.development {
            return Err(ConfigError::Invalid(format!(
                "production and development branches are both {:?}",
                branches.production
            )));
        }

        if branches.release == branches.hotfix {
            return Err(ConfigError::Invalid(format!(
                "release and hotfix prefixes are both {:?}",
                branches.release
            )));
        }

        Ok(())
    }
}

/// Remote and recovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// The remote pushed to and fetched from.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Reset the working copy to the remote production branch when a
    /// workflow fails after it started changing things.
    #[serde(default)]
    pub undo: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            undo: false,
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Version configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConfig {
    /// Prefix for release and hotfix tags (e.g., "v").
    #[serde(default)]
    pub tag_prefix: String,
}

impl VersionConfig {
    /// Returns the tag name for a version.
    #[must_use]
    pub fn tag(&self, version: &Version) -> String {
        format!("{}{version}", self.tag_prefix)
    }
}

/// Plugin-specific configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Maven plugin options.
    #[serde(default)]
    pub maven: MavenPluginConfig,

    /// Plain text plugin options.
    #[serde(default)]
    pub text: TextPluginConfig,
}

/// Maven plugin options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MavenPluginConfig {
    /// Replace snapshot dependencies with releases when a release starts.
    #[serde(default = "default_true")]
    pub use_releases: bool,
}

impl Default for MavenPluginConfig {
    fn default() -> Self {
        Self { use_releases: true }
    }
}

fn default_true() -> bool {
    true
}

/// Plain text plugin options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPluginConfig {
    /// Version file relative to the project root.
    #[serde(default = "default_text_file")]
    pub file: String,
}

impl Default for TextPluginConfig {
    fn default() -> Self {
        Self {
            file: default_text_file(),
        }
    }
}

fn default_text_file() -> String {
    "VERSION".to_string()
}

//! Gitflow branch roles and their configured names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::VersionError;

/// The role a branch plays in the Gitflow model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    /// The permanent branch releases are merged into and tagged on.
    Production,
    /// The permanent integration branch.
    Development,
    /// A temporary branch stabilising the next release.
    Release,
    /// A temporary branch fixing a production release.
    Hotfix,
}

impl BranchKind {
    /// Returns true for the temporary release and hotfix kinds.
    #[must_use]
    pub fn is_temporary(self) -> bool {
        matches!(self, Self::Release | Self::Hotfix)
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
            Self::Release => write!(f, "release"),
            Self::Hotfix => write!(f, "hotfix"),
        }
    }
}

impl FromStr for BranchKind {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Self::Production),
            "development" => Ok(Self::Development),
            "release" => Ok(Self::Release),
            "hotfix" => Ok(Self::Hotfix),
            other => Err(VersionError::UnsupportedBranchKind(other.to_string())),
        }
    }
}

/// How a branch kind is looked up among refs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchMatch {
    /// The branch name must be equal.
    Exact(String),
    /// The branch name must start with the prefix (e.g. `release/`).
    Prefix(String),
}

impl BranchMatch {
    /// Returns true if the short branch name matches.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(expected) => name == expected,
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()) && name.len() > prefix.len(),
        }
    }
}

/// Configured branch names for each [`BranchKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchNames {
    /// Production branch name.
    #[serde(default = "default_production")]
    pub production: String,

    /// Development branch name.
    #[serde(default = "default_development")]
    pub development: String,

    /// Release branch prefix.
    #[serde(default = "default_release")]
    pub release: String,

    /// Hotfix branch prefix.
    #[serde(default = "default_hotfix")]
    pub hotfix: String,
}

impl BranchNames {
    /// Returns the configured name for a branch kind.
    #[must_use]
    pub fn name(&self, kind: BranchKind) -> &str {
        match kind {
            BranchKind::Production => &self.production,
            BranchKind::Development => &self.development,
            BranchKind::Release => &self.release,
            BranchKind::Hotfix => &self.hotfix,
        }
    }

    /// Returns how branches of the given kind are recognised.
    #[must_use]
    pub fn matcher(&self, kind: BranchKind) -> BranchMatch {
        let name = self.name(kind);
        if kind.is_temporary() {
            BranchMatch::Prefix(format!("{name}/"))
        } else {
            BranchMatch::Exact(name.to_string())
        }
    }
}

impl Default for BranchNames {
    fn default() -> Self {
        Self {
            production: default_production(),
            development: default_development(),
            release: default_release(),
            hotfix: default_hotfix(),
        }
    }
}

fn default_production() -> String {
    "main".to_string()
}

fn default_development() -> String {
    "develop".to_string()
}

fn default_release() -> String {
    "release".to_string()
}

fn default_hotfix() -> String {
    "hotfix".to_string()
}

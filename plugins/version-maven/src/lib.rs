//! Maven version plugin.
//!
//! Reads and rewrites the project's own `<version>` in `pom.xml`, leaving
//! parent, dependency and plugin versions untouched. After the release
//! qualifier is removed, SNAPSHOT dependencies can be moved to their
//! releases with `mvn versions:use-releases`.

use std::fs;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::LazyLock;

use gitflow_git::Repository;
use gitflow_plugin::{
    HookRegistry, HookType, Plugin, PluginError, PluginResult, VersionPlugin, run_tool,
    sync_development_version,
};
use gitflow_version::Version;
use regex::Regex;
use tracing::debug;

const POM: &str = "pom.xml";

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<(/)?([A-Za-z_][\w.:-]*)[^>]*?(/)?>").expect("invalid regex")
});

/// Version plugin for Maven projects.
pub struct MavenPlugin {
    use_releases: bool,
}

impl MavenPlugin {
    /// Creates the plugin. With `use_releases`, SNAPSHOT dependencies are
    /// replaced by releases when a release starts.
    #[must_use]
    pub fn new(use_releases: bool) -> Self {
        Self { use_releases }
    }

    /// Returns whether dependencies are moved to releases.
    #[must_use]
    pub fn use_releases(&self) -> bool {
        self.use_releases
    }

    fn path(repository: &dyn Repository) -> PathBuf {
        repository.local_path().join(POM)
    }

    fn read_pom(repository: &dyn Repository) -> PluginResult<(PathBuf, String, Range<usize>)> {
        let path = Self::path(repository);
        if !path.is_file() {
            return Err(PluginError::FileNotFound(path));
        }
        let content = fs::read_to_string(&path)?;
        let span = project_version_span(&content)
            .ok_or_else(|| PluginError::VersionNotFound(path.display().to_string()))?;
        Ok((path, content, span))
    }
}

impl Default for MavenPlugin {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Plugin for MavenPlugin {
    fn name(&self) -> &'static str {
        "maven"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &'static str {
        "Manages the project version in pom.xml"
    }
}

impl VersionPlugin for MavenPlugin {
    fn version_files(&self) -> Vec<&str> {
        vec![POM]
    }

    fn snapshot_qualifier(&self) -> &str {
        "SNAPSHOT"
    }

    fn required_tools(&self) -> Vec<&'static str> {
        if self.use_releases {
            vec!["mvn"]
        } else {
            Vec::new()
        }
    }

    fn read_version(&self, repository: &dyn Repository) -> PluginResult<Version> {
        let (_, content, span) = Self::read_pom(repository)?;
        Ok(Version::parse(content[span].trim())?)
    }

    fn write_version(&self, repository: &dyn Repository, version: &Version) -> PluginResult<()> {
        let (path, mut content, span) = Self::read_pom(repository)?;
        content.replace_range(span, &version.to_string());
        fs::write(&path, content)?;
        debug!(%version, "updated pom.xml");
        Ok(())
    }

    fn register_hooks(&self, hooks: &mut HookRegistry) {
        hooks.bind(
            HookType::AfterMergeIntoDevelopment,
            self.name(),
            sync_development_version,
        );

        if self.use_releases {
            hooks.bind(HookType::AfterUpdateProjectVersion, self.name(), |ctx| {
                run_tool(
                    ctx.repository.local_path(),
                    "mvn",
                    &["versions:use-releases", "-DgenerateBackupPoms=false"],
                )?;
                Ok(())
            });
        }
    }
}

/// Returns the byte range of the text inside the `<version>` element that
/// is a direct child of the root element.
fn project_version_span(content: &str) -> Option<Range<usize>> {
    let mut depth = 0usize;
    let mut start = None;

    for captures in TAG_PATTERN.captures_iter(content) {
        let (Some(tag), Some(name)) = (captures.get(0), captures.get(2)) else {
            continue;
        };
        let is_version = name.as_str() == "version";

        if captures.get(1).is_some() {
            if depth == 2
                && is_version
                && let Some(start) = start
            {
                return Some(start..tag.start());
            }
            depth = depth.saturating_sub(1);
        } else if captures.get(3).is_none() {
            depth += 1;
            if depth == 2 && is_version {
                start = Some(tag.end());
            }
        }
    }

    None
}

//! Project version value type.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{VersionError, VersionResult};

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)(?:-([A-Za-z0-9_]+))?$")
        .expect("invalid version regex")
});

/// Which version component an increment touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Increment {
    /// No arithmetic was applied.
    #[default]
    None,
    /// Bump major, reset minor and patch.
    Major,
    /// Bump minor, reset patch.
    Minor,
    /// Bump patch only.
    Patch,
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
        }
    }
}

/// A `major.minor.patch[-qualifier]` project version.
///
/// Numeric components keep the exact digits they were parsed from, so
/// formatting a parsed version reproduces the input. Every operation returns
/// a new value.
#[derive(Debug, Clone)]
pub struct Version {
    major: String,
    minor: String,
    patch: String,
    qualifier: String,
    increment: Increment,
}

impl Version {
    /// Creates a version from numeric components without a qualifier.
    #[must_use]
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major: major.to_string(),
            minor: minor.to_string(),
            patch: patch.to_string(),
            qualifier: String::new(),
            increment: Increment::None,
        }
    }

    /// Parses a version string.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::InvalidVersionString`] unless the input matches
    /// `[0-9]+\.[0-9]+\.[0-9]+(-[A-Za-z0-9_]+)?` exactly.
    pub fn parse(input: &str) -> VersionResult<Self> {
        let captures = VERSION_PATTERN
            .captures(input)
            .ok_or_else(|| VersionError::InvalidVersionString(input.to_string()))?;

        let part = |index: usize| {
            captures
                .get(index)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };

        Ok(Self {
            major: part(1),
            minor: part(2),
            patch: part(3),
            qualifier: part(4),
            increment: Increment::None,
        })
    }

    /// Returns the major component as written.
    #[must_use]
    pub fn major(&self) -> &str {
        &self.major
    }

    /// Returns the minor component as written.
    #[must_use]
    pub fn minor(&self) -> &str {
        &self.minor
    }

    /// Returns the patch component as written.
    #[must_use]
    pub fn patch(&self) -> &str {
        &self.patch
    }

    /// Returns the qualifier, if any.
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        if self.qualifier.is_empty() {
            None
        } else {
            Some(&self.qualifier)
        }
    }

    /// Returns the increment that produced this value.
    #[must_use]
    pub fn increment(&self) -> Increment {
        self.increment
    }

    /// Returns the next version for the given increment.
    ///
    /// The qualifier is carried over unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::Overflow`] if a component does not fit in a
    /// `u64` once incremented.
    pub fn next(&self, increment: Increment) -> VersionResult<Self> {
        let mut next = self.clone();
        next.increment = increment;

        match increment {
            Increment::None => {}
            Increment::Major => {
                next.major = bump(&self.major)?;
                next.minor = "0".to_string();
                next.patch = "0".to_string();
            }
            Increment::Minor => {
                next.minor = bump(&self.minor)?;
                next.patch = "0".to_string();
            }
            Increment::Patch => {
                next.patch = bump(&self.patch)?;
            }
        }

        Ok(next)
    }

    /// Returns a copy carrying the given qualifier, replacing any existing one.
    #[must_use]
    pub fn with_qualifier(&self, qualifier: &str) -> Self {
        let mut version = self.clone();
        version.qualifier = qualifier.to_string();
        version
    }

    /// Returns a copy without a qualifier.
    #[must_use]
    pub fn without_qualifier(&self) -> Self {
        self.with_qualifier("")
    }

    /// Returns the branch name for this version under the given kind name,
    /// e.g. `release/1.2.0`.
    #[must_use]
    pub fn branch_name(&self, kind_name: &str) -> String {
        format!("{kind_name}/{self}")
    }
}

fn bump(component: &str) -> VersionResult<String> {
    component
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_add(1))
        .map(|n| n.to_string())
        .ok_or_else(|| VersionError::Overflow(component.to_string()))
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.qualifier == other.qualifier
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.qualifier.is_empty() {
            write!(f, "-{}", self.qualifier)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let version = v("1.2.3");
        assert_eq!(version.major(), "1");
        assert_eq!(version.minor(), "2");
        assert_eq!(version.patch(), "3");
        assert!(version.qualifier().is_none());
    }

    #[test]
    fn test_parse_with_qualifier() {
        let version = v("1.2.3-SNAPSHOT");
        assert_eq!(version.qualifier(), Some("SNAPSHOT"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "",
            "1.2",
            "1.2.3.4",
            "v1.2.3",
            "1.2.3-",
            "1.2.3-rc.1",
            " 1.2.3",
            "a.b.c",
            "\u{661}.\u{662}.\u{663}",
            "1.0.0-d\u{e9}v",
        ] {
            assert!(
                matches!(Version::parse(input), Err(VersionError::InvalidVersionString(_))),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn test_format_preserves_input() {
        for input in [
            "0.0.0",
            "1.10.200",
            "01.002.3",
            "2.0.0-dev",
            "3.1.4-SNAPSHOT",
            "1.0.0-rc_1",
        ] {
            assert_eq!(v(input).to_string(), input);
        }
    }

    #[test]
    fn test_next_major() {
        let next = v("1.2.3-dev").next(Increment::Major).unwrap();
        assert_eq!(next.to_string(), "2.0.0-dev");
        assert_eq!(next.increment(), Increment::Major);
    }

    #[test]
    fn test_next_minor() {
        let next = v("1.2.3").next(Increment::Minor).unwrap();
        assert_eq!(next.to_string(), "1.3.0");
        assert_eq!(next.minor(), "3");
        assert_eq!(next.patch(), "0");
    }

    #[test]
    fn test_next_patch() {
        let next = v("1.2.3").next(Increment::Patch).unwrap();
        assert_eq!(next.to_string(), "1.2.4");
    }

    #[test]
    fn test_next_none_is_identity() {
        let version = v("4.5.6-dev");
        assert_eq!(version.next(Increment::None).unwrap(), version);
    }

    #[test]
    fn test_next_overflow() {
        let version = v("1.18446744073709551615.0");
        assert!(matches!(
            version.next(Increment::Minor),
            Err(VersionError::Overflow(_))
        ));
    }

    #[test]
    fn test_next_component_too_large_to_parse() {
        let version = v("99999999999999999999999.0.0");
        assert!(version.next(Increment::Major).is_err());
        // Untouched components are never re-parsed.
        assert_eq!(
            version.next(Increment::Patch).unwrap().to_string(),
            "99999999999999999999999.0.1"
        );
    }

    #[test]
    fn test_minor_increment_properties() {
        for input in ["0.0.0", "1.9.9", "7.41.3-dev"] {
            let version = v(input);
            let next = version.next(Increment::Minor).unwrap();
            let before: u64 = version.minor().parse().unwrap();
            let after: u64 = next.minor().parse().unwrap();
            assert_eq!(after, before + 1);
            assert_eq!(next.patch(), "0");
            assert_eq!(next.major(), version.major());
        }
    }

    #[test]
    fn test_qualifier_operations_are_idempotent() {
        let version = v("1.0.0-dev");
        let stripped = version.without_qualifier();
        assert_eq!(stripped.without_qualifier(), stripped);
        assert_eq!(stripped.to_string(), "1.0.0");

        let qualified = stripped.with_qualifier("SNAPSHOT");
        assert_eq!(qualified.with_qualifier("SNAPSHOT"), qualified);
        assert_eq!(qualified.to_string(), "1.0.0-SNAPSHOT");
    }

    #[test]
    fn test_removing_absent_qualifier_is_noop() {
        let version = v("1.0.0");
        assert_eq!(version.without_qualifier(), version);
    }

    #[test]
    fn test_qualifier_participates_in_equality() {
        assert_ne!(v("1.0.0"), v("1.0.0-dev"));
    }

    #[test]
    fn test_increment_ignored_by_equality() {
        let bumped = v("1.0.0").next(Increment::Minor).unwrap();
        assert_eq!(bumped, v("1.1.0"));
    }

    #[test]
    fn test_branch_name() {
        assert_eq!(v("1.2.0").branch_name("release"), "release/1.2.0");
        assert_eq!(v("1.0.1").branch_name("hotfix"), "hotfix/1.0.1");
    }

    #[test]
    fn test_from_str() {
        let version: Version = "3.2.1".parse().unwrap();
        assert_eq!(version, Version::new(3, 2, 1));
    }

    #[test]
    fn test_increment_display() {
        assert_eq!(Increment::Major.to_string(), "major");
        assert_eq!(Increment::None.to_string(), "none");
    }
}

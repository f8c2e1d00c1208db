//! Version file helpers.
//!
//! Supports reading and updating version numbers in:
//! - JSON manifests with a top-level `"version"` field
//! - Files carrying a `version = "..."` assignment (TOML, `setup.py`)

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use gitflow_version::Version;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::{PluginError, PluginResult};

static ASSIGNMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^(\s*version\s*=\s*)(["'])([^"']+)(["'])"#).expect("invalid regex")
});

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn read_existing(path: &Path) -> PluginResult<String> {
    if !path.is_file() {
        return Err(PluginError::FileNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Reads and parses a JSON file.
///
/// # Errors
///
/// Returns an error if the file is missing or is not valid JSON.
pub fn read_json(path: &Path) -> PluginResult<Value> {
    let content = read_existing(path)?;
    serde_json::from_str(&content).map_err(|e| PluginError::Parse {
        file: display(path),
        reason: e.to_string(),
    })
}

/// Writes JSON with the indentation already used by the file and a trailing
/// newline. Key order is preserved.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_json(path: &Path, value: &Value) -> PluginResult<()> {
    let indent = fs::read_to_string(path)
        .ok()
        .and_then(|content| detect_indent(&content))
        .unwrap_or_else(|| "  ".to_string());

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| PluginError::Parse {
            file: display(path),
            reason: e.to_string(),
        })?;
    buffer.push(b'\n');

    fs::write(path, buffer)?;
    Ok(())
}

/// Returns the leading whitespace of the first indented line.
fn detect_indent(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];
        (!indent.is_empty() && !trimmed.is_empty()).then(|| indent.to_string())
    })
}

/// Reads the top-level `"version"` field of a JSON manifest.
///
/// # Errors
///
/// Returns an error if the file is missing, the field is absent or not a
/// string, or the value is not a valid version.
pub fn read_json_version(path: &Path) -> PluginResult<Version> {
    let json = read_json(path)?;
    let raw = json
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| PluginError::VersionNotFound(display(path)))?;

    Ok(Version::parse(raw)?)
}

/// Sets the top-level `"version"` field of a JSON manifest, adding it if
/// absent.
///
/// # Errors
///
/// Returns an error if the file is missing, not a JSON object, or cannot be
/// written.
pub fn write_json_version(path: &Path, version: &Version) -> PluginResult<()> {
    let mut json = read_json(path)?;
    let object = json.as_object_mut().ok_or_else(|| PluginError::Parse {
        file: display(path),
        reason: "not a JSON object".to_string(),
    })?;

    object.insert("version".to_string(), Value::String(version.to_string()));
    write_json(path, &json)
}

/// Reads the first `version = "..."` assignment in a file.
///
/// # Errors
///
/// Returns an error if the file is missing, has no assignment, or the value
/// is not a valid version.
pub fn read_assignment_version(path: &Path) -> PluginResult<Version> {
    let content = read_existing(path)?;
    let captures = ASSIGNMENT_PATTERN
        .captures(&content)
        .ok_or_else(|| PluginError::VersionNotFound(display(path)))?;

    let raw = captures.get(3).map(|m| m.as_str()).unwrap_or_default();
    Ok(Version::parse(raw)?)
}

/// Rewrites the first `version = "..."` assignment, keeping its spacing and
/// quote style.
///
/// # Errors
///
/// Returns an error if the file is missing, has no assignment, or cannot be
/// written.
pub fn write_assignment_version(path: &Path, version: &Version) -> PluginResult<()> {
    let content = read_existing(path)?;
    if !ASSIGNMENT_PATTERN.is_match(&content) {
        return Err(PluginError::VersionNotFound(display(path)));
    }

    let updated = ASSIGNMENT_PATTERN.replace(&content, format!("${{1}}${{2}}{version}${{4}}"));
    fs::write(path, updated.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_read_json_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.json");
        fs::write(&path, r#"{"name": "app", "version": "1.2.3-dev"}"#).unwrap();

        assert_eq!(read_json_version(&path).unwrap(), v("1.2.3-dev"));
    }

    #[test]
    fn test_read_json_version_missing_field() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.json");
        fs::write(&path, r#"{"name": "app"}"#).unwrap();

        assert!(matches!(
            read_json_version(&path),
            Err(PluginError::VersionNotFound(_))
        ));
    }

    #[test]
    fn test_read_json_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.json");

        assert!(matches!(
            read_json_version(&path),
            Err(PluginError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_read_json_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(read_json(&path), Err(PluginError::Parse { .. })));
    }

    #[test]
    fn test_write_json_version_preserves_order_and_indent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("composer.json");
        fs::write(
            &path,
            "{\n    \"name\": \"vendor/app\",\n    \"version\": \"1.0.0\",\n    \"type\": \"library\"\n}\n",
        )
        .unwrap();

        write_json_version(&path, &v("1.1.0-dev")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{\n    \"name\": \"vendor/app\",\n    \"version\": \"1.1.0-dev\",\n    \"type\": \"library\"\n}\n"
        );
    }

    #[test]
    fn test_write_json_version_adds_field() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("composer.json");
        fs::write(&path, "{\n  \"name\": \"vendor/app\"\n}\n").unwrap();

        write_json_version(&path, &v("0.1.0")).unwrap();
        assert_eq!(read_json_version(&path).unwrap(), v("0.1.0"));
    }

    #[test]
    fn test_write_json_version_rejects_non_object() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.json");
        fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(
            write_json_version(&path, &v("1.0.0")),
            Err(PluginError::Parse { .. })
        ));
    }

    #[test]
    fn test_assignment_version_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pyproject.toml");
        fs::write(
            &path,
            "[project]\nname = \"app\"\nversion = \"1.0.0.dev\"\n",
        )
        .unwrap();
        assert!(matches!(
            read_assignment_version(&path),
            Err(PluginError::Version(_))
        ));

        fs::write(&path, "[project]\nname = \"app\"\nversion = \"1.0.0-dev\"\n").unwrap();
        assert_eq!(read_assignment_version(&path).unwrap(), v("1.0.0-dev"));

        write_assignment_version(&path, &v("1.0.0")).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[project]\nname = \"app\"\nversion = \"1.0.0\"\n"
        );
    }

    #[test]
    fn test_assignment_version_setup_py_single_quotes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("setup.py");
        fs::write(
            &path,
            "setup(\n    name='app',\n    version='2.3.0',\n)\n",
        )
        .unwrap();

        assert_eq!(read_assignment_version(&path).unwrap(), v("2.3.0"));
        write_assignment_version(&path, &v("2.4.0-dev")).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "setup(\n    name='app',\n    version='2.4.0-dev',\n)\n"
        );
    }

    #[test]
    fn test_assignment_version_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pyproject.toml");
        fs::write(&path, "[project]\nname = \"app\"\n").unwrap();

        assert!(matches!(
            write_assignment_version(&path, &v("1.0.0")),
            Err(PluginError::VersionNotFound(_))
        ));
    }

    #[test]
    fn test_detect_indent() {
        assert_eq!(detect_indent("{\n\t\"a\": 1\n}"), Some("\t".to_string()));
        assert_eq!(detect_indent("{}"), None);
    }
}

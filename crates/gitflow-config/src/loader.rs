//! Configuration loader.

use std::path::Path;

use tracing::debug;

use crate::{Config, ConfigError, ConfigResult};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "gitflow.toml";

/// Loads and validates configuration from the given path.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    debug!(?path, "loading configuration");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;

    Ok(config)
}

/// Finds and loads configuration starting from the given directory.
///
/// Walks up the directory tree until a configuration file is found.
///
/// # Errors
///
/// Returns an error if no configuration file is found or it cannot be parsed.
pub fn find_and_load_config_from(start_dir: impl AsRef<Path>) -> ConfigResult<Config> {
    let start_dir = start_dir.as_ref();
    let mut dir = start_dir;

    loop {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return load_config(config_path);
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    Err(ConfigError::NotFound(start_dir.join(CONFIG_FILE_NAME)))
}

/// Resolves the configuration for a project.
///
/// An explicit path must exist. Without one, the nearest `gitflow.toml` at
/// or above `project_dir` is used, and defaults apply when there is none.
///
/// # Errors
///
/// Returns an error if an explicit file is missing, or if the file in use
/// cannot be parsed or validated.
pub fn load_or_default(explicit: Option<&Path>, project_dir: &Path) -> ConfigResult<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    match find_and_load_config_from(project_dir) {
        Err(ConfigError::NotFound(_)) => {
            debug!(?project_dir, "no configuration file, using defaults");
            Ok(Config::default())
        }
        other => other,
    }
}

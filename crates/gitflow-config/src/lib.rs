//! Configuration management for Gitflow.
//!
//! This crate handles loading and validating the `gitflow.toml` configuration file.

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, find_and_load_config_from, load_config, load_or_default};
pub use schema::{
    Config, MavenPluginConfig, PluginsConfig, RepositoryConfig, TextPluginConfig, VersionConfig,
};

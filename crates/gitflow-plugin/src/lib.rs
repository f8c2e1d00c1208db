//! Plugin system for Gitflow.
//!
//! This crate provides the plugin traits and infrastructure:
//! - [`Plugin`]: Base trait for all plugins
//! - [`VersionPlugin`]: Reads and writes a project's version stamp
//! - [`HookRegistry`]: Extension points plugins bind to during workflows
//! - [`files`]: Version file helpers shared by the concrete plugins

mod error;
pub mod files;
mod hooks;
mod tools;
mod traits;

pub use error::{PluginError, PluginResult};
pub use hooks::{HookContext, HookFn, HookRegistry, HookType, sync_development_version};
pub use tools::{ensure_tools, run_tool};
pub use traits::Plugin;
pub use traits::version::VersionPlugin;

//! Version plugin registry.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use gitflow_plugin::{HookRegistry, VersionPlugin};
use tracing::debug;

/// Registered version plugins in priority order, plus the fallback used
/// when none of them claims a project.
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn VersionPlugin>>,
    fallback: Arc<dyn VersionPlugin>,
    hooks: HookRegistry,
}

impl PluginRegistry {
    /// Creates a registry with only the fallback plugin.
    #[must_use]
    pub fn new(fallback: Arc<dyn VersionPlugin>) -> Self {
        let mut hooks = HookRegistry::new();
        fallback.register_hooks(&mut hooks);
        Self {
            plugins: Vec::new(),
            fallback,
            hooks,
        }
    }

    /// Registers a plugin after the existing ones and binds its hooks.
    pub fn register(&mut self, plugin: Arc<dyn VersionPlugin>) {
        debug!(plugin = plugin.name(), "registering plugin");
        plugin.register_hooks(&mut self.hooks);
        self.plugins.push(plugin);
    }

    /// Registers a plugin, builder style.
    #[must_use]
    pub fn with_plugin(mut self, plugin: Arc<dyn VersionPlugin>) -> Self {
        self.register(plugin);
        self
    }

    /// Returns the first registered plugin detecting `root`, else the fallback.
    #[must_use]
    pub fn select(&self, root: &Path) -> Arc<dyn VersionPlugin> {
        self.plugins
            .iter()
            .find(|plugin| plugin.detect(root))
            .map_or_else(|| Arc::clone(&self.fallback), Arc::clone)
    }

    /// Returns registered plugin names in priority order, without the fallback.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    /// Returns the fallback plugin.
    #[must_use]
    pub fn fallback(&self) -> &dyn VersionPlugin {
        self.fallback.as_ref()
    }

    /// Returns the hooks bound by every plugin.
    #[must_use]
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .field("fallback", &self.fallback.name())
            .field("hooks", &self.hooks)
            .finish()
    }
}

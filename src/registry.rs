//! Plugin registry tracking per-plugin load status.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::error::{Error, Result};
use crate::plugin::{MeshEffectPlugin, PluginInfo};

/// Configuration for the plugin registry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegistryConfig {
    /// Maximum number of plugins allowed.
    pub max_plugins: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { max_plugins: 100 }
    }
}

impl RegistryConfig {
    /// Create a new registry configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of plugins.
    pub fn with_max_plugins(mut self, max: usize) -> Self {
        self.max_plugins = max;
        self
    }
}

/// Outcome of a plugin's load action.
///
/// `Ok` and `Error` are terminal: a plugin is loaded at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PluginStatus {
    /// The load action has not run yet.
    NotLoaded,
    /// The load action succeeded.
    Ok,
    /// The load action failed; the plugin is refused.
    Error,
}

impl std::fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotLoaded => "not loaded",
            Self::Ok => "ok",
            Self::Error => "error",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug)]
pub(crate) struct EntryState {
    pub(crate) status: PluginStatus,
    pub(crate) unloaded: bool,
}

/// A registered plugin and its load state.
pub struct PluginEntry {
    plugin: Arc<dyn MeshEffectPlugin>,
    info: PluginInfo,
    state: Mutex<EntryState>,
}

impl PluginEntry {
    fn new(plugin: Arc<dyn MeshEffectPlugin>, info: PluginInfo) -> Self {
        Self {
            plugin,
            info,
            state: Mutex::new(EntryState {
                status: PluginStatus::NotLoaded,
                unloaded: false,
            }),
        }
    }

    /// Plugin identifier.
    pub fn identifier(&self) -> &str {
        &self.info.identifier
    }

    /// Plugin information captured at registration.
    pub fn info(&self) -> &PluginInfo {
        &self.info
    }

    /// The plugin itself.
    pub fn plugin(&self) -> &Arc<dyn MeshEffectPlugin> {
        &self.plugin
    }

    /// Current load status.
    pub fn status(&self) -> PluginStatus {
        self.state.lock().status
    }

    /// Check if the plugin was explicitly unloaded.
    pub fn is_unloaded(&self) -> bool {
        self.state.lock().unloaded
    }

    // Held across the load and unload actions.
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, EntryState> {
        self.state.lock()
    }
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PluginEntry")
            .field("identifier", &self.info.identifier)
            .field("status", &state.status)
            .field("unloaded", &state.unloaded)
            .finish()
    }
}

/// Registry statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Total plugins registered.
    pub total: usize,
    /// Plugins whose load action has not run.
    pub not_loaded: usize,
    /// Plugins loaded successfully.
    pub loaded: usize,
    /// Plugins that failed to load.
    pub failed: usize,
    /// Plugins explicitly unloaded.
    pub unloaded: usize,
}

/// Registry of plugins handed over by the embedding application.
///
/// Plugins keep the index they were registered at.
pub struct PluginRegistry {
    config: RegistryConfig,
    entries: RwLock<Vec<Arc<PluginEntry>>>,
    by_id: DashMap<String, usize>,
}

impl PluginRegistry {
    /// Create a new plugin registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(Vec::new()),
            by_id: DashMap::new(),
        }
    }

    /// Create with default configuration.
    pub fn default_config() -> Self {
        Self::new(RegistryConfig::default())
    }

    /// Get the registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a plugin, returning its index.
    pub fn register(&self, plugin: Arc<dyn MeshEffectPlugin>) -> Result<usize> {
        let info = plugin.info();

        if !info.is_supported() {
            return Err(Error::UnsupportedApi {
                api: info.api,
                version: info.api_version,
            });
        }

        let mut entries = self.entries.write();

        if entries.len() >= self.config.max_plugins {
            return Err(Error::Registry(format!(
                "registry full: max {} plugins",
                self.config.max_plugins
            )));
        }

        if self.by_id.contains_key(&info.identifier) {
            return Err(Error::PluginAlreadyRegistered(info.identifier));
        }

        let index = entries.len();
        tracing::debug!("Registered plugin {} at index {}", info, index);
        self.by_id.insert(info.identifier.clone(), index);
        entries.push(Arc::new(PluginEntry::new(plugin, info)));

        Ok(index)
    }

    /// Get a plugin by index.
    pub fn get(&self, index: usize) -> Option<Arc<PluginEntry>> {
        self.entries.read().get(index).cloned()
    }

    /// Get a plugin by identifier.
    pub fn find(&self, identifier: &str) -> Option<Arc<PluginEntry>> {
        let index = self.index_of(identifier)?;
        self.get(index)
    }

    /// Index of a plugin by identifier.
    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.by_id.get(identifier).map(|r| *r.value())
    }

    /// Check if a plugin is registered.
    pub fn contains(&self, identifier: &str) -> bool {
        self.by_id.contains_key(identifier)
    }

    /// Plugin identifiers in registration order.
    pub fn identifiers(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .map(|e| e.identifier().to_string())
            .collect()
    }

    /// All entries in registration order.
    pub fn entries(&self) -> Vec<Arc<PluginEntry>> {
        self.entries.read().clone()
    }

    /// Get plugin count.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Get registry statistics.
    pub fn stats(&self) -> RegistryStats {
        let entries = self.entries.read();
        let mut stats = RegistryStats {
            total: entries.len(),
            ..RegistryStats::default()
        };

        for entry in entries.iter() {
            let state = entry.lock_state();
            if state.unloaded {
                stats.unloaded += 1;
            }
            match state.status {
                PluginStatus::NotLoaded => stats.not_loaded += 1,
                PluginStatus::Ok => stats.loaded += 1,
                PluginStatus::Error => stats.failed += 1,
            }
        }

        stats
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("config", &self.config)
            .field("plugin_count", &self.len())
            .finish()
    }
}

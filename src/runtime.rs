//! Mesh effect runtime tying the host, the registry and the lifecycle together.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{Error, Result};
use crate::host::{HostConfig, HostHandle, HostRuntime};
use crate::lifecycle::{EffectLifecycle, LifecycleEvent, LifecycleHooks};
use crate::mesh::EffectInstance;
use crate::plugin::MeshEffectPlugin;
use crate::registry::{PluginEntry, PluginRegistry, PluginStatus, RegistryConfig, RegistryStats};

/// Configuration for the mesh effect runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuntimeConfig {
    /// Host configuration.
    pub host: HostConfig,
    /// Registry configuration.
    pub registry: RegistryConfig,
    /// Whether to unload every loaded plugin on shutdown.
    pub unload_on_shutdown: bool,
}

impl RuntimeConfig {
    /// Create a new runtime configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host configuration.
    pub fn with_host(mut self, host: HostConfig) -> Self {
        self.host = host;
        self
    }

    /// Set the registry configuration.
    pub fn with_registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }

    /// Unload loaded plugins when the runtime shuts down.
    pub fn with_unload_on_shutdown(mut self, unload: bool) -> Self {
        self.unload_on_shutdown = unload;
        self
    }

    /// Parse a configuration from TOML.
    #[cfg(feature = "serde")]
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Parse a configuration from JSON.
    #[cfg(feature = "serde")]
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Load a configuration file; `.json` files are read as JSON, anything
    /// else as TOML.
    #[cfg(feature = "serde")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content),
        }
    }
}

/// Runtime hosting mesh effect plugins.
///
/// Holds one reference on the host for its whole life; each use takes and
/// drops one more.
pub struct MeshEffectRuntime {
    config: RuntimeConfig,
    host_runtime: HostRuntime,
    host: Mutex<Option<HostHandle>>,
    registry: PluginRegistry,
    hooks: Arc<RwLock<LifecycleHooks>>,
}

impl MeshEffectRuntime {
    /// Create a new runtime and build its host.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let host_runtime = HostRuntime::new(config.host.clone());
        let host = host_runtime.acquire()?;
        let registry = PluginRegistry::new(config.registry.clone());

        Ok(Self {
            config,
            host_runtime,
            host: Mutex::new(Some(host)),
            registry,
            hooks: Arc::new(RwLock::new(LifecycleHooks::new())),
        })
    }

    /// Create with default configuration.
    pub fn default_config() -> Result<Self> {
        Self::new(RuntimeConfig::default())
    }

    /// Get the runtime configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Get the plugin registry.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Get the host runtime.
    pub fn host_runtime(&self) -> &HostRuntime {
        &self.host_runtime
    }

    /// The live host, or `None` after shutdown.
    ///
    /// Used by the embedding application to install mesh hooks.
    pub fn host(&self) -> Option<HostHandle> {
        self.host.lock().clone()
    }

    /// Add a lifecycle event handler.
    pub fn on_event<F>(&self, handler: F)
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        self.hooks.write().on_event(handler);
    }

    /// Record lifecycle events into prometheus metrics.
    #[cfg(feature = "metrics-prometheus")]
    pub fn attach_metrics(&self, metrics: Arc<crate::metrics::EffectMetrics>) {
        self.on_event(move |event| metrics.record_event(event));
    }

    /// Register a plugin, returning its index.
    pub fn register(&self, plugin: Arc<dyn MeshEffectPlugin>) -> Result<usize> {
        self.registry.register(plugin)
    }

    /// Get plugin count.
    pub fn plugin_count(&self) -> usize {
        self.registry.len()
    }

    /// Get registry statistics.
    pub fn stats(&self) -> RegistryStats {
        self.registry.stats()
    }

    /// Load status of a plugin.
    pub fn plugin_status(&self, index: usize) -> Option<PluginStatus> {
        self.registry.get(index).map(|e| e.status())
    }

    /// Describe, instantiate and cook a plugin with default parameters.
    pub fn use_plugin(&self, index: usize) -> Result<()> {
        self.use_plugin_with(index, |_| Ok(()))
    }

    /// Describe, instantiate and cook a plugin.
    ///
    /// `prepare` runs between createInstance and cook, and is where the
    /// caller sets parameter values or attaches native mesh data to inputs.
    /// Errors are returned after the instance and descriptor are released.
    pub fn use_plugin_with<F>(&self, index: usize, prepare: F) -> Result<()>
    where
        F: FnOnce(&mut EffectInstance) -> Result<()>,
    {
        let entry = self.entry(index)?;

        // Taken under the runtime's own handle so shutdown cannot slip in
        // between and leave this use building a fresh host.
        let host = {
            let live = self.host.lock();
            if live.is_none() {
                return Err(Error::bad_handle("runtime is shut down"));
            }
            self.host_runtime.acquire()?
        };
        let result = EffectLifecycle::new(&entry, &host, &self.hooks).run(prepare);
        let released = self.host_runtime.release();

        if let Err(e) = &result {
            tracing::warn!("Use of plugin {} failed: {}", entry.identifier(), e);
        }
        result.and(released)
    }

    /// Run a plugin's unload action and unbind it from the host.
    ///
    /// The plugin stays registered but later uses are refused.
    pub fn unload_plugin(&self, index: usize) -> Result<()> {
        let entry = self.entry(index)?;
        let host = self.live_host()?;
        EffectLifecycle::new(&entry, &host, &self.hooks).unload()
    }

    /// Shutdown the runtime, dropping its host reference.
    ///
    /// Loaded plugins are unloaded first if the configuration asks for it.
    /// Calling this more than once has no further effect.
    pub fn shutdown(&self) {
        let Some(host) = self.host.lock().take() else {
            return;
        };

        if self.config.unload_on_shutdown {
            for entry in self.registry.entries() {
                if let Err(e) = EffectLifecycle::new(&entry, &host, &self.hooks).unload() {
                    tracing::warn!("Failed to unload plugin {}: {}", entry.identifier(), e);
                }
            }
        }

        drop(host);
        if let Err(e) = self.host_runtime.release() {
            tracing::warn!("Failed to release host: {}", e);
        }
    }

    fn entry(&self, index: usize) -> Result<Arc<PluginEntry>> {
        self.registry
            .get(index)
            .ok_or_else(|| Error::plugin_not_found(format!("index {}", index)))
    }

    fn live_host(&self) -> Result<HostHandle> {
        self.host()
            .ok_or_else(|| Error::bad_handle("runtime is shut down"))
    }
}

impl std::fmt::Debug for MeshEffectRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshEffectRuntime")
            .field("config", &self.config)
            .field("plugin_count", &self.registry.len())
            .field("host_uses", &self.host_runtime.use_count())
            .finish()
    }
}

impl Drop for MeshEffectRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

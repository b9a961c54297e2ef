//! The host object plugins talk to, and its reference-counted runtime.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::property::{keys, Opaque, PropertyContext, PropertySet, SharedPropertySet};
use crate::status::Status;
use crate::suite::{self, Suite};

/// Shared handle to the host.
pub type HostHandle = Arc<Host>;

/// Hook run by the host around plugin mesh access.
///
/// Installed by the embedding application to convert between its own mesh
/// representation and the attribute buffers plugins see.
pub type MeshCallback = Arc<dyn Fn(&Host, &mut Mesh) -> Status + Send + Sync>;

/// Suite lookup entry point.
pub type FetchSuiteFn = fn(&Host, &str, i32) -> Option<Suite>;

/// Host identification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HostConfig {
    /// Host name reported to plugins.
    pub name: String,
    /// Human readable host label.
    pub label: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            name: "mesh-effect-host".to_string(),
            label: "Mesh Effect Host".to_string(),
        }
    }
}

impl HostConfig {
    /// Create a new host config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the host label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// The host object handed to plugins.
pub struct Host {
    properties: SharedPropertySet,
    fetch_suite: FetchSuiteFn,
}

impl Host {
    fn new(config: &HostConfig) -> Result<Self> {
        let mut properties = PropertySet::new(PropertyContext::Host);
        properties.set_string(keys::NAME, 0, &config.name)?;
        properties.set_string(keys::LABEL, 0, &config.label)?;
        properties.set_pointer(keys::HOST_BEFORE_MESH_GET_CB, 0, Opaque::null())?;
        properties.set_pointer(keys::HOST_BEFORE_MESH_RELEASE_CB, 0, Opaque::null())?;

        Ok(Self {
            properties: properties.into_shared(),
            fetch_suite: suite::fetch_suite,
        })
    }

    /// Host-level properties.
    pub fn properties(&self) -> &SharedPropertySet {
        &self.properties
    }

    /// Look up a suite by exact name and version.
    pub fn fetch_suite(&self, name: &str, version: i32) -> Option<Suite> {
        (self.fetch_suite)(self, name, version)
    }

    /// Install the hook run before a plugin gets a mesh.
    pub fn set_before_mesh_get<F>(&self, hook: F) -> Result<()>
    where
        F: Fn(&Host, &mut Mesh) -> Status + Send + Sync + 'static,
    {
        self.set_hook(keys::HOST_BEFORE_MESH_GET_CB, Arc::new(hook))
    }

    /// Install the hook run before a plugin releases a mesh.
    pub fn set_before_mesh_release<F>(&self, hook: F) -> Result<()>
    where
        F: Fn(&Host, &mut Mesh) -> Status + Send + Sync + 'static,
    {
        self.set_hook(keys::HOST_BEFORE_MESH_RELEASE_CB, Arc::new(hook))
    }

    /// Remove both mesh hooks.
    pub fn clear_hooks(&self) -> Result<()> {
        let mut properties = self.properties.write();
        properties.set_pointer(keys::HOST_BEFORE_MESH_GET_CB, 0, Opaque::null())?;
        properties.set_pointer(keys::HOST_BEFORE_MESH_RELEASE_CB, 0, Opaque::null())
    }

    /// The installed before-mesh-get hook, if any.
    pub fn before_mesh_get(&self) -> Option<MeshCallback> {
        self.hook(keys::HOST_BEFORE_MESH_GET_CB)
    }

    /// The installed before-mesh-release hook, if any.
    pub fn before_mesh_release(&self) -> Option<MeshCallback> {
        self.hook(keys::HOST_BEFORE_MESH_RELEASE_CB)
    }

    fn set_hook(&self, key: &str, hook: MeshCallback) -> Result<()> {
        self.properties
            .write()
            .set_pointer(key, 0, Opaque::new(hook))
    }

    // Cloned out so the lock is not held while the hook runs.
    fn hook(&self, key: &str) -> Option<MeshCallback> {
        let pointer = self.properties.read().get_pointer(key, 0).ok()?;
        pointer.downcast_ref::<MeshCallback>().cloned()
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("properties", &self.properties.read().len())
            .finish()
    }
}

struct HostSlot {
    host: Option<HostHandle>,
    uses: usize,
}

/// Reference-counted owner of the single host object.
///
/// The host is built on the first [`acquire`](Self::acquire) and torn down
/// when the matching number of [`release`](Self::release) calls brings the
/// count back to zero. A later acquire builds a fresh host.
pub struct HostRuntime {
    config: HostConfig,
    slot: Mutex<HostSlot>,
}

impl HostRuntime {
    /// Create a runtime with no live host.
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(HostSlot {
                host: None,
                uses: 0,
            }),
        }
    }

    /// Get the host configuration.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Take a reference on the host, building it if needed.
    pub fn acquire(&self) -> Result<HostHandle> {
        let mut slot = self.slot.lock();

        let host = match &slot.host {
            Some(host) => host.clone(),
            None => {
                let host = Arc::new(Host::new(&self.config)?);
                tracing::info!("Host {} constructed", self.config.name);
                slot.host = Some(host.clone());
                host
            }
        };
        slot.uses += 1;

        Ok(host)
    }

    /// Drop a reference on the host, tearing it down on the last one.
    pub fn release(&self) -> Result<()> {
        let mut slot = self.slot.lock();

        if slot.uses == 0 {
            return Err(Error::bad_handle("host released more times than acquired"));
        }
        slot.uses -= 1;

        if slot.uses == 0 {
            if let Some(host) = slot.host.take() {
                host.properties.write().clear();
                tracing::info!("Host {} torn down", self.config.name);
            }
        }

        Ok(())
    }

    /// Number of outstanding references.
    pub fn use_count(&self) -> usize {
        self.slot.lock().uses
    }

    /// Check if a host is currently built.
    pub fn is_alive(&self) -> bool {
        self.slot.lock().host.is_some()
    }

    /// The live host, without taking a reference.
    pub fn current(&self) -> Option<HostHandle> {
        self.slot.lock().host.clone()
    }
}

impl std::fmt::Debug for HostRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("HostRuntime")
            .field("config", &self.config)
            .field("alive", &slot.host.is_some())
            .field("uses", &slot.uses)
            .finish()
    }
}

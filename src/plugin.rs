//! Plugin entry points.

use crate::host::HostHandle;
use crate::mesh::MeshEffect;
use crate::property::PropertySet;
use crate::status::{Action, Status};

/// API name every mesh effect plugin must report.
pub const PLUGIN_API: &str = "OfxMeshEffectPluginAPI";

/// API version supported by this host.
pub const PLUGIN_API_VERSION: i32 = 1;

/// Static information about a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PluginInfo {
    /// API the plugin implements.
    pub api: String,
    /// API version the plugin implements.
    pub api_version: i32,
    /// Unique plugin identifier.
    pub identifier: String,
    /// Major plugin version.
    pub version_major: u32,
    /// Minor plugin version.
    pub version_minor: u32,
}

impl PluginInfo {
    /// Create plugin info for the mesh effect API.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            api: PLUGIN_API.to_string(),
            api_version: PLUGIN_API_VERSION,
            identifier: identifier.into(),
            version_major: 1,
            version_minor: 0,
        }
    }

    /// Set the plugin version.
    pub fn with_version(mut self, major: u32, minor: u32) -> Self {
        self.version_major = major;
        self.version_minor = minor;
        self
    }

    /// Check if this host can drive the plugin.
    pub fn is_supported(&self) -> bool {
        self.api == PLUGIN_API && self.api_version == PLUGIN_API_VERSION
    }
}

impl std::fmt::Display for PluginInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} v{}.{}",
            self.identifier, self.version_major, self.version_minor
        )
    }
}

/// An already loaded mesh effect plugin.
///
/// Discovering and loading plugin binaries is left to the embedding
/// application, which hands the registry values implementing this trait.
pub trait MeshEffectPlugin: Send + Sync {
    /// Static plugin information.
    fn info(&self) -> PluginInfo;

    /// Bind the plugin to the host, or unbind it with `None`.
    fn set_host(&self, host: Option<HostHandle>);

    /// Dispatch one action.
    ///
    /// `effect` is the descriptor for describe, the instance for
    /// createInstance, cook and destroyInstance, and `None` for load and
    /// unload.
    fn main_entry(
        &self,
        action: Action,
        effect: Option<&mut MeshEffect>,
        in_args: Option<&PropertySet>,
        out_args: Option<&mut PropertySet>,
    ) -> Status;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_info() {
        let info = PluginInfo::new("net.example.mirror").with_version(2, 3);
        assert!(info.is_supported());
        assert_eq!(info.to_string(), "net.example.mirror v2.3");

        let mut other = info.clone();
        other.api_version = 2;
        assert!(!other.is_supported());
        other.api_version = 1;
        other.api = "OfxImageEffectPluginAPI".to_string();
        assert!(!other.is_supported());
    }
}

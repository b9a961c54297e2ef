//! # mesh-effect-host
//!
//! Host runtime for Open Mesh Effect plugins: binds already loaded plugins
//! to a shared host, hands them versioned function suites, and drives each
//! plugin through its describe, createInstance, cook and destroyInstance
//! actions.
//!
//! This crate provides:
//! - **Property sets** - Typed, multi-slot metadata attached to every host object
//! - **Parameters** - Named, typed effect parameters backed by property sets
//! - **Suites** - Property, parameter and mesh effect function tables
//! - **Host runtime** - Reference-counted host with mesh access hooks
//! - **Plugin registry** - One-shot load status per plugin
//! - **Effect lifecycle** - Descriptor and instance handling with teardown on every path
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mesh_effect_host::{MeshEffectRuntime, RuntimeConfig, Status};
//!
//! let runtime = MeshEffectRuntime::new(RuntimeConfig::default())?;
//! let index = runtime.register(my_plugin)?;
//!
//! // Fill input meshes from the application's own geometry
//! runtime.host().unwrap().set_before_mesh_get(|_host, mesh| {
//!     // ...
//!     Status::Ok
//! })?;
//!
//! runtime.use_plugin(index)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serializable configuration, TOML and JSON config loading
//! - `metrics-prometheus`: Prometheus metrics integration

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod error;
mod host;
mod lifecycle;
mod mesh;
mod parameter;
mod plugin;
mod property;
mod registry;
mod runtime;
mod status;
pub mod suite;

#[cfg(feature = "metrics-prometheus")]
mod metrics;

pub use error::{Error, Result};
pub use host::{Host, HostConfig, HostHandle, HostRuntime, MeshCallback};
pub use lifecycle::{EffectLifecycle, LifecycleEvent, LifecycleHooks};
pub use mesh::{
    Attribute, AttributeAttachment, AttributeData, AttributeType, EffectDescriptor,
    EffectInstance, Mesh, MeshEffect, MeshInput, ATTRIB_FACE_COUNTS, ATTRIB_POINT_POSITION,
    ATTRIB_VERTEX_POINT, MAIN_INPUT, MAIN_OUTPUT,
};
pub use parameter::{Parameter, ParameterSet, ParameterType};
pub use plugin::{MeshEffectPlugin, PluginInfo, PLUGIN_API, PLUGIN_API_VERSION};
pub use property::{keys, Opaque, PropertyContext, PropertySet, PropertyValue, SharedPropertySet};
pub use registry::{PluginEntry, PluginRegistry, PluginStatus, RegistryConfig, RegistryStats};
pub use runtime::{MeshEffectRuntime, RuntimeConfig};
pub use status::{Action, Status};
pub use suite::Suite;

#[cfg(feature = "metrics-prometheus")]
pub use metrics::{EffectMetrics, MetricsConfig};

/// Crate version for compatibility checks.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

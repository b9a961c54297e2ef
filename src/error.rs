//! Error types for mesh effect host operations.

use thiserror::Error;

use crate::property::PropertyContext;
use crate::status::{Action, Status};

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while hosting mesh effect plugins.
#[derive(Error, Debug)]
pub enum Error {
    /// A required handle was missing or of the wrong kind.
    #[error("bad handle: {0}")]
    BadHandle(String),

    /// Property name is not legal for the set's context, or was never set.
    #[error("unknown property {key} in {context} property set")]
    UnknownProperty {
        /// Property name.
        key: String,
        /// Context of the property set.
        context: PropertyContext,
    },

    /// Slot or component index out of range, or slot empty.
    #[error("bad index {index} for {key}")]
    BadIndex {
        /// Property or parameter name.
        key: String,
        /// Requested index.
        index: usize,
    },

    /// Value of the wrong kind.
    #[error("value error for {key}: expected {expected}, found {found}")]
    ValueKind {
        /// Property or parameter name.
        key: String,
        /// Kind requested by the caller.
        expected: String,
        /// Kind actually stored.
        found: String,
    },

    /// Value out of its legal range.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Parameter type keyword not in the vocabulary.
    #[error("unknown parameter type: {0}")]
    UnknownParameterType(String),

    /// Parameter not found in its set.
    #[error("parameter not found: {0}")]
    ParameterNotFound(String),

    /// Input, parameter or attribute already defined.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Mesh input not found on the effect.
    #[error("input not found: {0}")]
    InputNotFound(String),

    /// Mesh attribute not found.
    #[error("attribute not found: {attachment}/{name}")]
    AttributeNotFound {
        /// Attachment the attribute was looked up on.
        attachment: String,
        /// Attribute name.
        name: String,
    },

    /// Buffer allocation failed.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// A host hook reported a failure.
    #[error("{hook} hook failed with {status}")]
    HookFailed {
        /// Hook slot name.
        hook: &'static str,
        /// Status returned by the hook.
        status: Status,
    },

    /// Suite not provided at the requested version.
    #[error("missing host feature: suite {suite} v{version}")]
    MissingHostFeature {
        /// Suite name.
        suite: String,
        /// Requested version.
        version: i32,
    },

    /// Plugin not found in the registry.
    #[error("plugin not found: {0}")]
    PluginNotFound(String),

    /// Plugin identifier already registered.
    #[error("plugin already registered: {0}")]
    PluginAlreadyRegistered(String),

    /// Plugin API or API version not supported by this host.
    #[error("unsupported plugin API: {api} v{version}")]
    UnsupportedApi {
        /// API name reported by the plugin.
        api: String,
        /// API version reported by the plugin.
        version: i32,
    },

    /// Plugin failed its load action earlier and is disabled.
    #[error("plugin failed to load: {0}")]
    PluginUnavailable(String),

    /// Plugin was explicitly unloaded.
    #[error("plugin was unloaded: {0}")]
    PluginUnloaded(String),

    /// A plugin action reported a failure status.
    #[error("{plugin}: {action} failed with {status}")]
    ActionFailed {
        /// Plugin identifier.
        plugin: String,
        /// Failing action.
        action: Action,
        /// Status returned by the plugin.
        status: Status,
    },

    /// Registry error.
    #[error("registry error: {0}")]
    Registry(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error.
    #[cfg(feature = "serde")]
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Metrics registration error.
    #[cfg(feature = "metrics-prometheus")]
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl Error {
    /// Create a bad handle error.
    pub fn bad_handle(msg: impl Into<String>) -> Self {
        Self::BadHandle(msg.into())
    }

    /// Create a bad index error.
    pub fn bad_index(key: impl Into<String>, index: usize) -> Self {
        Self::BadIndex {
            key: key.into(),
            index,
        }
    }

    /// Create a value kind error.
    pub fn value_kind(
        key: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::ValueKind {
            key: key.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Create a plugin not found error.
    pub fn plugin_not_found(name: impl Into<String>) -> Self {
        Self::PluginNotFound(name.into())
    }

    /// Create an action failed error.
    pub fn action_failed(plugin: impl Into<String>, action: Action, status: Status) -> Self {
        Self::ActionFailed {
            plugin: plugin.into(),
            action,
            status,
        }
    }

    /// Status code a plugin observes for this error.
    pub fn status(&self) -> Status {
        match self {
            Self::BadHandle(_)
            | Self::UnknownProperty { .. }
            | Self::ParameterNotFound(_)
            | Self::InputNotFound(_)
            | Self::PluginNotFound(_) => Status::ErrBadHandle,
            Self::BadIndex { .. } => Status::ErrBadIndex,
            Self::ValueKind { .. } | Self::InvalidValue(_) => Status::ErrValue,
            Self::UnknownParameterType(_) | Self::AttributeNotFound { .. } => Status::ErrUnknown,
            Self::AlreadyExists(_) | Self::PluginAlreadyRegistered(_) => Status::ErrExists,
            Self::OutOfMemory(_) => Status::ErrMemory,
            Self::HookFailed { status, .. } | Self::ActionFailed { status, .. } => *status,
            Self::MissingHostFeature { .. } => Status::ErrMissingHostFeature,
            Self::UnsupportedApi { .. } => Status::ErrUnsupported,
            Self::PluginUnavailable(_) | Self::PluginUnloaded(_) => Status::Failed,
            Self::Registry(_) | Self::Io(_) => Status::Failed,
            #[cfg(feature = "serde")]
            Self::ConfigParse(_) => Status::Failed,
            #[cfg(feature = "metrics-prometheus")]
            Self::Metrics(_) => Status::Failed,
        }
    }

    /// Returns true if this error came from a plugin-declared failure.
    pub fn is_plugin_failure(&self) -> bool {
        matches!(self, Self::ActionFailed { .. } | Self::PluginUnavailable(_))
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        err.status()
    }
}

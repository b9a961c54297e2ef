//! Versioned function tables plugins request from the host.
//!
//! Every table is a `&'static` value: fetching the same suite twice hands
//! back the same table.

mod mesh_effect;
mod parameter;
mod property;

pub use mesh_effect::{MeshEffectSuiteV1, MESH_EFFECT_SUITE_V1};
pub use parameter::{ParameterSuiteV1, PARAMETER_SUITE_V1};
pub use property::{PropertySuiteV1, PROPERTY_SUITE_V1};

use crate::host::Host;

/// Name of the property suite.
pub const PROPERTY_SUITE: &str = "OfxPropertySuite";
/// Name of the parameter suite.
pub const PARAMETER_SUITE: &str = "OfxParameterSuite";
/// Name of the mesh effect suite.
pub const MESH_EFFECT_SUITE: &str = "OfxMeshEffectSuite";

/// A host-provided function table.
#[derive(Clone, Copy)]
pub enum Suite {
    /// Property access.
    Property(&'static PropertySuiteV1),
    /// Parameter definition and access.
    Parameter(&'static ParameterSuiteV1),
    /// Effect, input, mesh and attribute access.
    MeshEffect(&'static MeshEffectSuiteV1),
}

impl Suite {
    /// Suite name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Property(_) => PROPERTY_SUITE,
            Self::Parameter(_) => PARAMETER_SUITE,
            Self::MeshEffect(_) => MESH_EFFECT_SUITE,
        }
    }

    /// Suite version.
    pub fn version(&self) -> i32 {
        1
    }

    /// The property table, if this is the property suite.
    pub fn as_property(&self) -> Option<&'static PropertySuiteV1> {
        match self {
            Self::Property(suite) => Some(suite),
            _ => None,
        }
    }

    /// The parameter table, if this is the parameter suite.
    pub fn as_parameter(&self) -> Option<&'static ParameterSuiteV1> {
        match self {
            Self::Parameter(suite) => Some(suite),
            _ => None,
        }
    }

    /// The mesh effect table, if this is the mesh effect suite.
    pub fn as_mesh_effect(&self) -> Option<&'static MeshEffectSuiteV1> {
        match self {
            Self::MeshEffect(suite) => Some(suite),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name())
            .field("version", &self.version())
            .finish()
    }
}

static SUITES: [(&str, i32, Suite); 3] = [
    (MESH_EFFECT_SUITE, 1, Suite::MeshEffect(&MESH_EFFECT_SUITE_V1)),
    (PARAMETER_SUITE, 1, Suite::Parameter(&PARAMETER_SUITE_V1)),
    (PROPERTY_SUITE, 1, Suite::Property(&PROPERTY_SUITE_V1)),
];

/// Look up a suite by exact name and exact version.
///
/// A known suite at another version is not provided.
pub fn fetch_suite(_host: &Host, name: &str, version: i32) -> Option<Suite> {
    let found = SUITES
        .iter()
        .find(|(n, v, _)| *n == name && *v == version)
        .map(|(_, _, suite)| *suite);

    if found.is_none() {
        tracing::debug!("Suite {} v{} not provided", name, version);
    }
    found
}

use crate::error::Result;
use crate::mesh::{
    Attribute, AttributeAttachment, AttributeType, Mesh, MeshEffect, MeshInput,
};
use crate::parameter::ParameterSet;
use crate::property::{PropertySet, SharedPropertySet};

/// Mesh effect suite, version 1.
pub struct MeshEffectSuiteV1 {
    /// Properties of an effect.
    pub get_property_set: fn(&MeshEffect) -> &SharedPropertySet,
    /// Parameters of an effect.
    pub get_param_set: fn(&mut MeshEffect) -> &mut ParameterSet,
    /// Define a new input.
    pub input_define: for<'a> fn(&'a mut MeshEffect, &str) -> Result<&'a mut MeshInput>,
    /// Look up an input by name.
    pub input_get_handle: for<'a> fn(&'a mut MeshEffect, &str) -> Result<&'a mut MeshInput>,
    /// Properties of an input.
    pub input_get_property_set: fn(&mut MeshInput) -> &mut PropertySet,
    /// Get the mesh of an input, running the before-mesh-get hook.
    pub input_get_mesh: fn(&mut MeshInput) -> Result<&mut Mesh>,
    /// Give a mesh back, running the before-mesh-release hook.
    pub input_release_mesh: fn(&mut MeshInput) -> Result<()>,
    /// Define an attribute on a mesh.
    pub attribute_define: for<'a> fn(
        &'a mut Mesh,
        AttributeAttachment,
        &str,
        usize,
        AttributeType,
    ) -> Result<&'a mut Attribute>,
    /// Look up an attribute of a mesh.
    pub mesh_get_attribute:
        for<'a> fn(&'a mut Mesh, AttributeAttachment, &str) -> Result<&'a mut Attribute>,
    /// Properties of a mesh.
    pub mesh_get_property_set: fn(&mut Mesh) -> &mut PropertySet,
    /// Allocate attribute buffers from the mesh counts.
    pub mesh_alloc: fn(&mut Mesh) -> Result<()>,
}

/// The mesh effect suite table.
pub static MESH_EFFECT_SUITE_V1: MeshEffectSuiteV1 = MeshEffectSuiteV1 {
    get_property_set: MeshEffect::properties,
    get_param_set: MeshEffect::parameters_mut,
    input_define: MeshEffect::define_input,
    input_get_handle: MeshEffect::input_mut,
    input_get_property_set: MeshInput::properties_mut,
    input_get_mesh: MeshInput::get_mesh,
    input_release_mesh: MeshInput::release_mesh,
    attribute_define: Mesh::define_attribute,
    mesh_get_attribute: Mesh::attribute_mut,
    mesh_get_property_set: Mesh::properties_mut,
    mesh_alloc: Mesh::allocate,
};

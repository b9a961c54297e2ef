//! Mesh effect handles, inputs, meshes and attribute buffers.
//!
//! A [`MeshEffect`] is the handle shape shared by [`EffectDescriptor`]s and
//! [`EffectInstance`]s. The host never interprets mesh content: it only
//! tracks element counts and owns the attribute buffers that plugins and the
//! embedding application's adaptor read and write.

use std::ops::{Deref, DerefMut};

use crate::error::{Error, Result};
use crate::host::HostHandle;
use crate::parameter::ParameterSet;
use crate::property::{keys, Opaque, PropertyContext, PropertySet, SharedPropertySet};

/// Name of the main input mesh.
pub const MAIN_INPUT: &str = "OfxMeshMainInput";
/// Name of the output mesh.
pub const MAIN_OUTPUT: &str = "OfxMeshMainOutput";

/// Point positions, 3 floats per point.
pub const ATTRIB_POINT_POSITION: &str = "OfxMeshAttribPointPosition";
/// Point index of each face corner, 1 int per vertex.
pub const ATTRIB_VERTEX_POINT: &str = "OfxMeshAttribVertexPoint";
/// Corner count of each face, 1 int per face.
pub const ATTRIB_FACE_COUNTS: &str = "OfxMeshAttribFaceCounts";

/// Element kind an attribute is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeAttachment {
    /// One value per point.
    Point,
    /// One value per face corner.
    Vertex,
    /// One value per face.
    Face,
    /// One value for the whole mesh.
    Mesh,
}

impl AttributeAttachment {
    /// Attachment keyword as used by plugins.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "OfxMeshAttribPoint",
            Self::Vertex => "OfxMeshAttribVertex",
            Self::Face => "OfxMeshAttribFace",
            Self::Mesh => "OfxMeshAttribMesh",
        }
    }

    /// Parse an attachment keyword.
    pub fn parse(keyword: &str) -> Option<Self> {
        [Self::Point, Self::Vertex, Self::Face, Self::Mesh]
            .into_iter()
            .find(|a| a.as_str() == keyword)
    }
}

impl std::fmt::Display for AttributeAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    /// 32-bit float components.
    Float,
    /// 32-bit signed integer components.
    Int,
    /// Unsigned byte components.
    UByte,
}

impl AttributeType {
    /// Type keyword as used by plugins.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Float => "OfxMeshAttribTypeFloat",
            Self::Int => "OfxMeshAttribTypeInt",
            Self::UByte => "OfxMeshAttribTypeUByte",
        }
    }

    /// Parse a type keyword.
    pub fn parse(keyword: &str) -> Option<Self> {
        [Self::Float, Self::Int, Self::UByte]
            .into_iter()
            .find(|t| t.as_str() == keyword)
    }
}

/// Owned attribute buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeData {
    /// Float components.
    Float(Vec<f32>),
    /// Integer components.
    Int(Vec<i32>),
    /// Byte components.
    UByte(Vec<u8>),
}

impl AttributeData {
    /// Number of components in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(data) => data.len(),
            Self::Int(data) => data.len(),
            Self::UByte(data) => data.len(),
        }
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn zeroed(kind: AttributeType, len: usize) -> Result<Self> {
        fn alloc<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
            let mut data = Vec::new();
            data.try_reserve_exact(len)
                .map_err(|e| Error::OutOfMemory(format!("{} components: {}", len, e)))?;
            data.resize(len, T::default());
            Ok(data)
        }

        Ok(match kind {
            AttributeType::Float => Self::Float(alloc(len)?),
            AttributeType::Int => Self::Int(alloc(len)?),
            AttributeType::UByte => Self::UByte(alloc(len)?),
        })
    }
}

/// A named per-element attribute of a mesh.
#[derive(Debug, Clone)]
pub struct Attribute {
    attachment: AttributeAttachment,
    name: String,
    component_count: usize,
    kind: AttributeType,
    properties: PropertySet,
    data: Option<AttributeData>,
}

impl Attribute {
    fn new(
        attachment: AttributeAttachment,
        name: &str,
        component_count: usize,
        kind: AttributeType,
    ) -> Result<Self> {
        if !(1..=4).contains(&component_count) {
            return Err(Error::invalid_value(format!(
                "attribute {} component count {} not in 1..=4",
                name, component_count
            )));
        }

        let mut properties = PropertySet::new(PropertyContext::Attrib);
        properties.set_string(keys::ATTRIB_TYPE, 0, kind.as_str())?;
        properties.set_int(keys::ATTRIB_COMPONENT_COUNT, 0, component_count as i32)?;
        properties.set_int(keys::ATTRIB_IS_OWNER, 0, 1)?;

        Ok(Self {
            attachment,
            name: name.to_string(),
            component_count,
            kind,
            properties,
            data: None,
        })
    }

    /// Get the attachment.
    pub fn attachment(&self) -> AttributeAttachment {
        self.attachment
    }

    /// Get the attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Components per element.
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// Component type.
    pub fn attribute_type(&self) -> AttributeType {
        self.kind
    }

    /// Get the attribute metadata.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// Get the attribute metadata for modification.
    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    /// Check if the buffer has been allocated.
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Get the buffer, if allocated.
    pub fn data(&self) -> Option<&AttributeData> {
        self.data.as_ref()
    }

    /// Get the buffer for modification, if allocated.
    pub fn data_mut(&mut self) -> Option<&mut AttributeData> {
        self.data.as_mut()
    }

    /// Float components, if this is an allocated float attribute.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            Some(AttributeData::Float(data)) => Some(data),
            _ => None,
        }
    }

    /// Mutable float components, if this is an allocated float attribute.
    pub fn as_f32_mut(&mut self) -> Option<&mut [f32]> {
        match &mut self.data {
            Some(AttributeData::Float(data)) => Some(data),
            _ => None,
        }
    }

    /// Integer components, if this is an allocated int attribute.
    pub fn as_i32(&self) -> Option<&[i32]> {
        match &self.data {
            Some(AttributeData::Int(data)) => Some(data),
            _ => None,
        }
    }

    /// Mutable integer components, if this is an allocated int attribute.
    pub fn as_i32_mut(&mut self) -> Option<&mut [i32]> {
        match &mut self.data {
            Some(AttributeData::Int(data)) => Some(data),
            _ => None,
        }
    }

    /// Byte components, if this is an allocated ubyte attribute.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.data {
            Some(AttributeData::UByte(data)) => Some(data),
            _ => None,
        }
    }

    /// Mutable byte components, if this is an allocated ubyte attribute.
    pub fn as_u8_mut(&mut self) -> Option<&mut [u8]> {
        match &mut self.data {
            Some(AttributeData::UByte(data)) => Some(data),
            _ => None,
        }
    }

    fn allocate(&mut self, element_count: usize) -> Result<()> {
        let len = element_count
            .checked_mul(self.component_count)
            .ok_or_else(|| Error::OutOfMemory(format!("attribute {}", self.name)))?;
        self.data = Some(AttributeData::zeroed(self.kind, len)?);
        Ok(())
    }
}

/// Mesh shape and attribute buffers exchanged with a plugin.
#[derive(Debug, Clone)]
pub struct Mesh {
    properties: PropertySet,
    attributes: Vec<Attribute>,
    is_input: bool,
    acquired: bool,
}

impl Mesh {
    /// Create an empty mesh with the three built-in attributes.
    pub fn new(is_input: bool) -> Result<Self> {
        let mut properties = PropertySet::new(PropertyContext::Mesh);
        for key in [keys::MESH_POINT_COUNT, keys::MESH_VERTEX_COUNT, keys::MESH_FACE_COUNT] {
            properties.set_int(key, 0, 0)?;
        }
        properties.set_pointer(keys::MESH_INTERNAL_DATA, 0, Opaque::null())?;

        let attributes = vec![
            Attribute::new(AttributeAttachment::Point, ATTRIB_POINT_POSITION, 3, AttributeType::Float)?,
            Attribute::new(AttributeAttachment::Vertex, ATTRIB_VERTEX_POINT, 1, AttributeType::Int)?,
            Attribute::new(AttributeAttachment::Face, ATTRIB_FACE_COUNTS, 1, AttributeType::Int)?,
        ];

        Ok(Self {
            properties,
            attributes,
            is_input,
            acquired: false,
        })
    }

    /// Get the mesh properties.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// Get the mesh properties for modification.
    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    /// True for input meshes, false for the output mesh.
    pub fn is_input(&self) -> bool {
        self.is_input
    }

    /// Check if a plugin currently holds the mesh.
    pub fn is_acquired(&self) -> bool {
        self.acquired
    }

    /// Number of points.
    pub fn point_count(&self) -> Result<usize> {
        self.count(keys::MESH_POINT_COUNT)
    }

    /// Number of face corners.
    pub fn vertex_count(&self) -> Result<usize> {
        self.count(keys::MESH_VERTEX_COUNT)
    }

    /// Number of faces.
    pub fn face_count(&self) -> Result<usize> {
        self.count(keys::MESH_FACE_COUNT)
    }

    /// Set point, vertex and face counts.
    pub fn set_counts(&mut self, points: i32, vertices: i32, faces: i32) -> Result<()> {
        self.properties.set_int(keys::MESH_POINT_COUNT, 0, points)?;
        self.properties.set_int(keys::MESH_VERTEX_COUNT, 0, vertices)?;
        self.properties.set_int(keys::MESH_FACE_COUNT, 0, faces)?;
        Ok(())
    }

    /// Host-private data attached by the embedding application.
    pub fn internal_data(&self) -> Opaque {
        self.properties
            .get_pointer(keys::MESH_INTERNAL_DATA, 0)
            .unwrap_or_default()
    }

    /// Attach host-private data.
    pub fn set_internal_data(&mut self, data: Opaque) -> Result<()> {
        self.properties.set_pointer(keys::MESH_INTERNAL_DATA, 0, data)
    }

    /// Number of elements for an attachment, from the mesh counts.
    pub fn element_count(&self, attachment: AttributeAttachment) -> Result<usize> {
        match attachment {
            AttributeAttachment::Point => self.point_count(),
            AttributeAttachment::Vertex => self.vertex_count(),
            AttributeAttachment::Face => self.face_count(),
            AttributeAttachment::Mesh => Ok(1),
        }
    }

    /// Define a new attribute.
    pub fn define_attribute(
        &mut self,
        attachment: AttributeAttachment,
        name: &str,
        component_count: usize,
        kind: AttributeType,
    ) -> Result<&mut Attribute> {
        if self.position(attachment, name).is_some() {
            return Err(Error::AlreadyExists(format!("attribute {}/{}", attachment, name)));
        }

        self.attributes
            .push(Attribute::new(attachment, name, component_count, kind)?);
        let last = self.attributes.len() - 1;
        Ok(&mut self.attributes[last])
    }

    /// Look up an attribute.
    pub fn attribute(&self, attachment: AttributeAttachment, name: &str) -> Result<&Attribute> {
        self.position(attachment, name)
            .map(|i| &self.attributes[i])
            .ok_or_else(|| attribute_not_found(attachment, name))
    }

    /// Look up an attribute for modification.
    pub fn attribute_mut(
        &mut self,
        attachment: AttributeAttachment,
        name: &str,
    ) -> Result<&mut Attribute> {
        let index = self
            .position(attachment, name)
            .ok_or_else(|| attribute_not_found(attachment, name))?;
        Ok(&mut self.attributes[index])
    }

    /// Iterate over attributes in definition order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    /// Allocate every attribute buffer from the current counts.
    ///
    /// Buffers are zero-filled. Previously allocated buffers are replaced.
    pub fn allocate(&mut self) -> Result<()> {
        let points = self.point_count()?;
        let vertices = self.vertex_count()?;
        let faces = self.face_count()?;

        for attribute in &mut self.attributes {
            let elements = match attribute.attachment {
                AttributeAttachment::Point => points,
                AttributeAttachment::Vertex => vertices,
                AttributeAttachment::Face => faces,
                AttributeAttachment::Mesh => 1,
            };
            attribute.allocate(elements)?;
        }

        tracing::debug!(points, vertices, faces, "allocated mesh buffers");
        Ok(())
    }

    /// Free every attribute buffer.
    pub fn release_buffers(&mut self) {
        for attribute in &mut self.attributes {
            attribute.data = None;
        }
    }

    fn count(&self, key: &str) -> Result<usize> {
        let count = self.properties.get_int(key, 0)?;
        usize::try_from(count)
            .map_err(|_| Error::invalid_value(format!("{} is negative: {}", key, count)))
    }

    fn position(&self, attachment: AttributeAttachment, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.attachment == attachment && a.name == name)
    }
}

fn attribute_not_found(attachment: AttributeAttachment, name: &str) -> Error {
    Error::AttributeNotFound {
        attachment: attachment.to_string(),
        name: name.to_string(),
    }
}

/// A named mesh input (or the output) of an effect.
#[derive(Debug)]
pub struct MeshInput {
    name: String,
    properties: PropertySet,
    mesh: Mesh,
    host: Option<HostHandle>,
}

impl MeshInput {
    fn new(name: &str, host: Option<HostHandle>) -> Result<Self> {
        let mut properties = PropertySet::new(PropertyContext::Input);
        properties.set_string(keys::NAME, 0, name)?;
        properties.set_string(keys::LABEL, 0, name)?;

        Ok(Self {
            name: name.to_string(),
            properties,
            mesh: Mesh::new(name != MAIN_OUTPUT)?,
            host,
        })
    }

    /// Get the input name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for the output mesh.
    pub fn is_output(&self) -> bool {
        self.name == MAIN_OUTPUT
    }

    /// Get the input properties.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// Get the input properties for modification.
    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    /// Borrow the mesh without running host hooks.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Borrow the mesh for modification without running host hooks.
    ///
    /// Used by the embedding application to attach internal data before cook.
    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    /// Hand the mesh to the plugin, running the before-mesh-get hook first.
    ///
    /// The hook runs once per acquisition; asking again before releasing
    /// returns the already prepared mesh.
    pub fn get_mesh(&mut self) -> Result<&mut Mesh> {
        let host = self
            .host
            .clone()
            .ok_or_else(|| Error::bad_handle(format!("input {} is not bound to a host", self.name)))?;

        if !self.mesh.acquired {
            if let Some(hook) = host.before_mesh_get() {
                let status = hook(&host, &mut self.mesh);
                if status.is_error() {
                    tracing::warn!(input = %self.name, %status, "before mesh get hook failed");
                    return Err(Error::HookFailed {
                        hook: keys::HOST_BEFORE_MESH_GET_CB,
                        status,
                    });
                }
            }
            self.mesh.acquired = true;
        }

        Ok(&mut self.mesh)
    }

    /// Take the mesh back from the plugin.
    ///
    /// Runs the before-mesh-release hook, then frees the attribute buffers
    /// whatever the hook reported.
    pub fn release_mesh(&mut self) -> Result<()> {
        if !self.mesh.acquired {
            return Err(Error::bad_handle(format!("mesh of input {} is not acquired", self.name)));
        }
        let host = self
            .host
            .clone()
            .ok_or_else(|| Error::bad_handle(format!("input {} is not bound to a host", self.name)))?;

        let status = match host.before_mesh_release() {
            Some(hook) => hook(&host, &mut self.mesh),
            None => crate::Status::Ok,
        };
        self.mesh.release_buffers();
        self.mesh.acquired = false;

        if status.is_error() {
            tracing::warn!(input = %self.name, %status, "before mesh release hook failed");
            return Err(Error::HookFailed {
                hook: keys::HOST_BEFORE_MESH_RELEASE_CB,
                status,
            });
        }
        Ok(())
    }

    fn fresh_copy(&self) -> Result<Self> {
        Ok(Self {
            name: self.name.clone(),
            properties: self.properties.clone(),
            mesh: Mesh::new(self.mesh.is_input)?,
            host: self.host.clone(),
        })
    }
}

/// The effect handle passed to plugin actions.
#[derive(Debug)]
pub struct MeshEffect {
    host: Option<HostHandle>,
    properties: SharedPropertySet,
    parameters: ParameterSet,
    inputs: Vec<MeshInput>,
}

impl MeshEffect {
    /// Create an empty effect bound to a host.
    pub fn new(host: Option<HostHandle>) -> Self {
        let properties = PropertySet::new(PropertyContext::MeshEffect).into_shared();
        Self {
            host,
            parameters: ParameterSet::with_effect_properties(properties.clone()),
            properties,
            inputs: Vec::new(),
        }
    }

    /// Host the effect is bound to.
    pub fn host(&self) -> Option<&HostHandle> {
        self.host.as_ref()
    }

    /// Effect-level properties.
    pub fn properties(&self) -> &SharedPropertySet {
        &self.properties
    }

    /// Effect parameters.
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Effect parameters for modification.
    pub fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.parameters
    }

    /// Define a new mesh input.
    pub fn define_input(&mut self, name: &str) -> Result<&mut MeshInput> {
        if self.inputs.iter().any(|i| i.name == name) {
            return Err(Error::AlreadyExists(format!("input {}", name)));
        }
        self.inputs.push(MeshInput::new(name, self.host.clone())?);
        let last = self.inputs.len() - 1;
        Ok(&mut self.inputs[last])
    }

    /// Look up an input by name.
    pub fn input(&self, name: &str) -> Result<&MeshInput> {
        self.inputs
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| Error::InputNotFound(name.to_string()))
    }

    /// Look up an input by name for modification.
    pub fn input_mut(&mut self, name: &str) -> Result<&mut MeshInput> {
        self.inputs
            .iter_mut()
            .find(|i| i.name == name)
            .ok_or_else(|| Error::InputNotFound(name.to_string()))
    }

    /// Iterate over inputs in definition order.
    pub fn inputs(&self) -> impl Iterator<Item = &MeshInput> {
        self.inputs.iter()
    }

    /// Copy this effect into a new, independent handle.
    ///
    /// Effect properties, parameters and input metadata are deep-copied and
    /// meshes start empty. The new parameter set keeps referring to *this*
    /// effect's property set, not to the copy's: effect-level metadata read
    /// through the parameter set stays singular across descriptor and
    /// instances.
    pub fn deep_copy(&self) -> Result<Self> {
        let mut parameters = ParameterSet::new();
        parameters.deep_copy_from(&self.parameters)?;

        Ok(Self {
            host: self.host.clone(),
            properties: self.properties.read().clone().into_shared(),
            parameters,
            inputs: self
                .inputs
                .iter()
                .map(MeshInput::fresh_copy)
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

/// Template effect produced by the describe action.
#[derive(Debug)]
pub struct EffectDescriptor(MeshEffect);

impl EffectDescriptor {
    /// Allocate an empty descriptor bound to a host.
    pub fn new(host: HostHandle) -> Self {
        Self(MeshEffect::new(Some(host)))
    }
}

impl Deref for EffectDescriptor {
    type Target = MeshEffect;

    fn deref(&self) -> &MeshEffect {
        &self.0
    }
}

impl DerefMut for EffectDescriptor {
    fn deref_mut(&mut self) -> &mut MeshEffect {
        &mut self.0
    }
}

/// Per-use effect copied from a descriptor.
#[derive(Debug)]
pub struct EffectInstance(MeshEffect);

impl EffectInstance {
    /// Deep-copy a descriptor into a new instance.
    pub fn from_descriptor(descriptor: &EffectDescriptor) -> Result<Self> {
        descriptor.0.deep_copy().map(Self)
    }
}

impl Deref for EffectInstance {
    type Target = MeshEffect;

    fn deref(&self) -> &MeshEffect {
        &self.0
    }
}

impl DerefMut for EffectInstance {
    fn deref_mut(&mut self) -> &mut MeshEffect {
        &mut self.0
    }
}

//! Generic typed property sets.
//!
//! Every host object (host, effect, parameter, input, mesh, attribute) carries
//! a [`PropertySet`] as its extensible metadata container. A property holds up
//! to [`MAX_SLOTS`] values, each an integer, double, string or opaque pointer.
//! The set's [`PropertyContext`] decides which property names are legal.

use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};

/// Maximum number of value slots per property.
pub const MAX_SLOTS: usize = 4;

/// A property set shared between several owners.
pub type SharedPropertySet = Arc<RwLock<PropertySet>>;

/// Standard property names.
pub mod keys {
    /// Machine name of the object.
    pub const NAME: &str = "OfxPropName";
    /// User-visible label.
    pub const LABEL: &str = "OfxPropLabel";
    /// Version of the object, as integers.
    pub const VERSION: &str = "OfxPropVersion";
    /// API version, as integers.
    pub const API_VERSION: &str = "OfxPropAPIVersion";
    /// Free-form plugin description.
    pub const PLUGIN_DESCRIPTION: &str = "OfxPropPluginDescription";

    /// Host hook run before a plugin reads an input mesh.
    pub const HOST_BEFORE_MESH_GET_CB: &str = "OfxHostPropBeforeMeshGetCb";
    /// Host hook run when a plugin releases a mesh.
    pub const HOST_BEFORE_MESH_RELEASE_CB: &str = "OfxHostPropBeforeMeshReleaseCb";

    /// Parameter type keyword.
    pub const PARAM_TYPE: &str = "OfxParamPropType";
    /// Parameter default value.
    pub const PARAM_DEFAULT: &str = "OfxParamPropDefault";
    /// Parameter minimum.
    pub const PARAM_MIN: &str = "OfxParamPropMin";
    /// Parameter maximum.
    pub const PARAM_MAX: &str = "OfxParamPropMax";
    /// Parameter tooltip.
    pub const PARAM_HINT: &str = "OfxParamPropHint";
    /// Parameter name for scripting.
    pub const PARAM_SCRIPT_NAME: &str = "OfxParamPropScriptName";
    /// Options of a choice parameter.
    pub const PARAM_CHOICE_OPTION: &str = "OfxParamPropChoiceOption";
    /// Name of the enclosing group parameter.
    pub const PARAM_PARENT: &str = "OfxParamPropParent";

    /// Number of points in a mesh.
    pub const MESH_POINT_COUNT: &str = "OfxMeshPropPointCount";
    /// Number of face corners in a mesh.
    pub const MESH_VERTEX_COUNT: &str = "OfxMeshPropVertexCount";
    /// Number of faces in a mesh.
    pub const MESH_FACE_COUNT: &str = "OfxMeshPropFaceCount";
    /// Host-private data attached to a mesh by the embedding application.
    pub const MESH_INTERNAL_DATA: &str = "OfxMeshPropInternalData";

    /// Attribute component type.
    pub const ATTRIB_TYPE: &str = "OfxMeshAttribPropType";
    /// Attribute component count.
    pub const ATTRIB_COMPONENT_COUNT: &str = "OfxMeshAttribPropComponentCount";
    /// Whether the host owns the attribute buffer.
    pub const ATTRIB_IS_OWNER: &str = "OfxMeshAttribPropIsOwner";
    /// Semantic hint (e.g. "color", "uv").
    pub const ATTRIB_SEMANTIC: &str = "OfxMeshAttribPropSemantic";
}

/// Kind of object a property set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyContext {
    /// Host-level properties.
    Host,
    /// Effect descriptor or instance properties.
    MeshEffect,
    /// Parameter metadata.
    Param,
    /// Mesh input metadata.
    Input,
    /// Mesh counts and internal data.
    Mesh,
    /// Mesh attribute metadata.
    Attrib,
    /// Action in/out arguments; any name is legal.
    Action,
}

impl PropertyContext {
    /// Property names legal in this context, or `None` if any name is.
    pub fn legal_keys(&self) -> Option<&'static [&'static str]> {
        use keys::*;

        match self {
            Self::Host => Some(&[
                NAME,
                LABEL,
                VERSION,
                API_VERSION,
                HOST_BEFORE_MESH_GET_CB,
                HOST_BEFORE_MESH_RELEASE_CB,
            ]),
            Self::MeshEffect => Some(&[NAME, LABEL, VERSION, PLUGIN_DESCRIPTION]),
            Self::Param => Some(&[
                NAME,
                LABEL,
                PARAM_TYPE,
                PARAM_DEFAULT,
                PARAM_MIN,
                PARAM_MAX,
                PARAM_HINT,
                PARAM_SCRIPT_NAME,
                PARAM_CHOICE_OPTION,
                PARAM_PARENT,
            ]),
            Self::Input => Some(&[NAME, LABEL]),
            Self::Mesh => Some(&[
                MESH_POINT_COUNT,
                MESH_VERTEX_COUNT,
                MESH_FACE_COUNT,
                MESH_INTERNAL_DATA,
            ]),
            Self::Attrib => Some(&[
                ATTRIB_TYPE,
                ATTRIB_COMPONENT_COUNT,
                ATTRIB_IS_OWNER,
                ATTRIB_SEMANTIC,
            ]),
            Self::Action => None,
        }
    }

    /// Check if a property name is legal in this context.
    pub fn allows(&self, key: &str) -> bool {
        self.legal_keys()
            .map_or(true, |legal| legal.iter().any(|k| *k == key))
    }
}

impl std::fmt::Display for PropertyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Host => "host",
            Self::MeshEffect => "mesh effect",
            Self::Param => "param",
            Self::Input => "input",
            Self::Mesh => "mesh",
            Self::Attrib => "attrib",
            Self::Action => "action",
        };
        write!(f, "{}", name)
    }
}

/// Nullable, type-erased pointer stored in a property slot.
///
/// Copying an `Opaque` shares the pointee.
#[derive(Clone, Default)]
pub struct Opaque(Option<Arc<dyn Any + Send + Sync>>);

impl Opaque {
    /// The null pointer.
    pub fn null() -> Self {
        Self(None)
    }

    /// Wrap a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// Wrap an already shared value.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self(Some(value as Arc<dyn Any + Send + Sync>))
    }

    /// Check for null.
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Borrow the pointee as `T`, if it is one.
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|value| value.downcast_ref::<T>())
    }

    /// Get a shared handle to the pointee as `T`, if it is one.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.0.clone().and_then(|value| value.downcast::<T>().ok())
    }

    /// Check whether two pointers share the same pointee (two nulls are equal).
    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl std::fmt::Debug for Opaque {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(value) => write!(f, "Opaque({:p})", Arc::as_ptr(value)),
            None => f.write_str("Opaque(null)"),
        }
    }
}

/// A single property slot value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Integer value.
    Int(i32),
    /// Double value.
    Double(f64),
    /// Owned string value.
    String(String),
    /// Opaque pointer value.
    Pointer(Opaque),
}

impl PropertyValue {
    /// Name of the value kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Pointer(_) => "pointer",
        }
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Opaque> for PropertyValue {
    fn from(value: Opaque) -> Self {
        Self::Pointer(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Property {
    name: String,
    slots: [Option<PropertyValue>; MAX_SLOTS],
}

impl Property {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slots: Default::default(),
        }
    }

    fn dimension(&self) -> usize {
        self.slots
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1)
    }
}

/// Extensible bag of named, multi-slot properties.
///
/// `Clone` is a deep copy: strings are duplicated, opaque pointers are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySet {
    context: PropertyContext,
    properties: Vec<Property>,
}

impl PropertySet {
    /// Create an empty property set for a context.
    pub fn new(context: PropertyContext) -> Self {
        Self {
            context,
            properties: Vec::new(),
        }
    }

    /// Wrap into a shared property set.
    pub fn into_shared(self) -> SharedPropertySet {
        Arc::new(RwLock::new(self))
    }

    /// Get the set's context.
    pub fn context(&self) -> PropertyContext {
        self.context
    }

    /// Number of properties set.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if no property has been set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Property names, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Check if a property has been set.
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Remove every property.
    pub fn clear(&mut self) {
        self.properties.clear();
    }

    /// Set one slot of a property, creating the property on first use.
    pub fn set(&mut self, key: &str, index: usize, value: impl Into<PropertyValue>) -> Result<()> {
        self.check_key(key)?;
        if index >= MAX_SLOTS {
            return Err(Error::bad_index(key, index));
        }

        let property = match self.properties.iter().position(|p| p.name == key) {
            Some(i) => &mut self.properties[i],
            None => {
                self.properties.push(Property::new(key));
                let last = self.properties.len() - 1;
                &mut self.properties[last]
            }
        };
        property.slots[index] = Some(value.into());
        Ok(())
    }

    /// Get one slot of a property.
    pub fn get(&self, key: &str, index: usize) -> Result<&PropertyValue> {
        self.check_key(key)?;
        if index >= MAX_SLOTS {
            return Err(Error::bad_index(key, index));
        }

        let property = self.find(key).ok_or_else(|| Error::UnknownProperty {
            key: key.to_string(),
            context: self.context,
        })?;
        property.slots[index]
            .as_ref()
            .ok_or_else(|| Error::bad_index(key, index))
    }

    /// Set an integer slot.
    pub fn set_int(&mut self, key: &str, index: usize, value: i32) -> Result<()> {
        self.set(key, index, value)
    }

    /// Set a double slot.
    pub fn set_double(&mut self, key: &str, index: usize, value: f64) -> Result<()> {
        self.set(key, index, value)
    }

    /// Set a string slot.
    pub fn set_string(&mut self, key: &str, index: usize, value: &str) -> Result<()> {
        self.set(key, index, value)
    }

    /// Set a pointer slot.
    pub fn set_pointer(&mut self, key: &str, index: usize, value: Opaque) -> Result<()> {
        self.set(key, index, value)
    }

    /// Get an integer slot.
    pub fn get_int(&self, key: &str, index: usize) -> Result<i32> {
        match self.get(key, index)? {
            PropertyValue::Int(value) => Ok(*value),
            other => Err(Error::value_kind(key, "int", other.kind())),
        }
    }

    /// Get a double slot.
    pub fn get_double(&self, key: &str, index: usize) -> Result<f64> {
        match self.get(key, index)? {
            PropertyValue::Double(value) => Ok(*value),
            other => Err(Error::value_kind(key, "double", other.kind())),
        }
    }

    /// Get a string slot.
    pub fn get_string(&self, key: &str, index: usize) -> Result<&str> {
        match self.get(key, index)? {
            PropertyValue::String(value) => Ok(value),
            other => Err(Error::value_kind(key, "string", other.kind())),
        }
    }

    /// Get a pointer slot.
    pub fn get_pointer(&self, key: &str, index: usize) -> Result<Opaque> {
        match self.get(key, index)? {
            PropertyValue::Pointer(value) => Ok(value.clone()),
            other => Err(Error::value_kind(key, "pointer", other.kind())),
        }
    }

    /// Set the leading slots of an integer property.
    pub fn set_int_n(&mut self, key: &str, values: &[i32]) -> Result<()> {
        if values.len() > MAX_SLOTS {
            return Err(Error::bad_index(key, values.len() - 1));
        }
        for (i, value) in values.iter().enumerate() {
            self.set_int(key, i, *value)?;
        }
        Ok(())
    }

    /// Set the leading slots of a double property.
    pub fn set_double_n(&mut self, key: &str, values: &[f64]) -> Result<()> {
        if values.len() > MAX_SLOTS {
            return Err(Error::bad_index(key, values.len() - 1));
        }
        for (i, value) in values.iter().enumerate() {
            self.set_double(key, i, *value)?;
        }
        Ok(())
    }

    /// Get the first `count` slots of an integer property.
    pub fn get_int_n(&self, key: &str, count: usize) -> Result<Vec<i32>> {
        (0..count).map(|i| self.get_int(key, i)).collect()
    }

    /// Get the first `count` slots of a double property.
    pub fn get_double_n(&self, key: &str, count: usize) -> Result<Vec<f64>> {
        (0..count).map(|i| self.get_double(key, i)).collect()
    }

    /// Number of addressable slots of a property (highest filled index + 1).
    pub fn dimension(&self, key: &str) -> Result<usize> {
        self.check_key(key)?;
        self.find(key)
            .map(Property::dimension)
            .ok_or_else(|| Error::UnknownProperty {
                key: key.to_string(),
                context: self.context,
            })
    }

    /// Clear every slot of a property, keeping the property itself.
    pub fn reset(&mut self, key: &str) -> Result<()> {
        self.check_key(key)?;
        let context = self.context;
        let property = self
            .properties
            .iter_mut()
            .find(|p| p.name == key)
            .ok_or_else(|| Error::UnknownProperty {
                key: key.to_string(),
                context,
            })?;
        property.slots = Default::default();
        Ok(())
    }

    fn find(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == key)
    }

    fn check_key(&self, key: &str) -> Result<()> {
        if self.context.allows(key) {
            Ok(())
        } else {
            Err(Error::UnknownProperty {
                key: key.to_string(),
                context: self.context,
            })
        }
    }
}

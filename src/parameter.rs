//! Effect parameters and parameter sets.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::property::{keys, PropertyContext, PropertySet, SharedPropertySet, MAX_SLOTS};

/// Type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// Single integer.
    Integer,
    /// Two integers.
    Integer2D,
    /// Three integers.
    Integer3D,
    /// Single double.
    Double,
    /// Two doubles.
    Double2D,
    /// Three doubles.
    Double3D,
    /// RGB color.
    Rgb,
    /// RGBA color.
    Rgba,
    /// Boolean flag.
    Boolean,
    /// Index into a list of options.
    Choice,
    /// Text.
    String,
    /// Plugin-defined data.
    Custom,
    /// Button without a value.
    PushButton,
    /// Grouping of other parameters.
    Group,
    /// Page of parameters.
    Page,
    /// Keyword not in the vocabulary.
    Unknown,
}

impl ParameterType {
    /// Every known type (excludes `Unknown`).
    pub const ALL: [ParameterType; 15] = [
        Self::Integer,
        Self::Integer2D,
        Self::Integer3D,
        Self::Double,
        Self::Double2D,
        Self::Double3D,
        Self::Rgb,
        Self::Rgba,
        Self::Boolean,
        Self::Choice,
        Self::String,
        Self::Custom,
        Self::PushButton,
        Self::Group,
        Self::Page,
    ];

    /// Type keyword as used by plugins.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "OfxParamTypeInteger",
            Self::Integer2D => "OfxParamTypeInteger2D",
            Self::Integer3D => "OfxParamTypeInteger3D",
            Self::Double => "OfxParamTypeDouble",
            Self::Double2D => "OfxParamTypeDouble2D",
            Self::Double3D => "OfxParamTypeDouble3D",
            Self::Rgb => "OfxParamTypeRGB",
            Self::Rgba => "OfxParamTypeRGBA",
            Self::Boolean => "OfxParamTypeBoolean",
            Self::Choice => "OfxParamTypeChoice",
            Self::String => "OfxParamTypeString",
            Self::Custom => "OfxParamTypeCustom",
            Self::PushButton => "OfxParamTypePushButton",
            Self::Group => "OfxParamTypeGroup",
            Self::Page => "OfxParamTypePage",
            Self::Unknown => "",
        }
    }

    /// Parse a type keyword. Unknown keywords map to [`ParameterType::Unknown`].
    pub fn parse(keyword: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == keyword)
            .unwrap_or(Self::Unknown)
    }

    /// Number of value components.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::Integer2D | Self::Double2D => 2,
            Self::Integer3D | Self::Double3D | Self::Rgb => 3,
            Self::Rgba => 4,
            _ => 1,
        }
    }

    fn slot_kind(&self) -> SlotKind {
        match self {
            Self::Integer | Self::Integer2D | Self::Integer3D | Self::Choice => SlotKind::Int,
            Self::Double | Self::Double2D | Self::Double3D | Self::Rgb | Self::Rgba => {
                SlotKind::Double
            }
            Self::Boolean => SlotKind::Bool,
            Self::String => SlotKind::String,
            Self::Custom | Self::PushButton | Self::Group | Self::Page | Self::Unknown => {
                SlotKind::None
            }
        }
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotKind {
    Int,
    Double,
    Bool,
    String,
    None,
}

impl SlotKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::String => "string",
            Self::None => "no value",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Empty,
    Int(i32),
    Double(f64),
    Bool(bool),
}

/// A named, typed effect parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    kind: ParameterType,
    slots: [Slot; MAX_SLOTS],
    text: Option<String>,
    properties: PropertySet,
}

impl Parameter {
    /// Create a Double parameter with empty value and metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterType::Double,
            slots: [Slot::Empty; MAX_SLOTS],
            text: None,
            properties: PropertySet::new(PropertyContext::Param),
        }
    }

    /// Get the parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the parameter type.
    pub fn param_type(&self) -> ParameterType {
        self.kind
    }

    /// Number of value components.
    pub fn dimensions(&self) -> usize {
        self.kind.dimensions()
    }

    /// Get the parameter metadata.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// Get the parameter metadata for modification.
    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    /// Change the parameter type.
    ///
    /// Does nothing if the type is unchanged. Otherwise the current value is
    /// discarded: numeric slots are cleared, a String parameter gets a fresh
    /// empty buffer and a parameter leaving String drops its buffer.
    pub fn set_type(&mut self, kind: ParameterType) {
        if self.kind == kind {
            return;
        }

        self.kind = kind;
        self.slots = [Slot::Empty; MAX_SLOTS];
        self.text = (kind == ParameterType::String).then(String::new);
    }

    /// Get an integer component.
    pub fn get_int(&self, index: usize) -> Result<i32> {
        self.check(SlotKind::Int, index)?;
        Ok(match self.slots[index] {
            Slot::Int(value) => value,
            _ => 0,
        })
    }

    /// Set an integer component.
    pub fn set_int(&mut self, index: usize, value: i32) -> Result<()> {
        self.check(SlotKind::Int, index)?;
        self.slots[index] = Slot::Int(value);
        Ok(())
    }

    /// Get a double component.
    pub fn get_double(&self, index: usize) -> Result<f64> {
        self.check(SlotKind::Double, index)?;
        Ok(match self.slots[index] {
            Slot::Double(value) => value,
            _ => 0.0,
        })
    }

    /// Set a double component.
    pub fn set_double(&mut self, index: usize, value: f64) -> Result<()> {
        self.check(SlotKind::Double, index)?;
        self.slots[index] = Slot::Double(value);
        Ok(())
    }

    /// Get a boolean value.
    pub fn get_bool(&self) -> Result<bool> {
        self.check(SlotKind::Bool, 0)?;
        Ok(matches!(self.slots[0], Slot::Bool(true)))
    }

    /// Set a boolean value.
    pub fn set_bool(&mut self, value: bool) -> Result<()> {
        self.check(SlotKind::Bool, 0)?;
        self.slots[0] = Slot::Bool(value);
        Ok(())
    }

    /// Get a string value.
    pub fn get_string(&self) -> Result<&str> {
        self.check(SlotKind::String, 0)?;
        self.text
            .as_deref()
            .ok_or_else(|| Error::bad_handle(format!("string buffer of {}", self.name)))
    }

    /// Replace a string value.
    pub fn set_string(&mut self, value: &str) -> Result<()> {
        self.check(SlotKind::String, 0)?;
        let buffer = self.text.get_or_insert_with(String::new);
        buffer.clear();
        buffer.push_str(value);
        Ok(())
    }

    /// Copy name, type, value and metadata from another parameter.
    ///
    /// The string buffer is freshly allocated.
    pub fn deep_copy_from(&mut self, other: &Parameter) {
        self.name = other.name.clone();
        self.kind = other.kind;
        self.slots = other.slots;
        self.text = other.text.clone();
        self.properties = other.properties.clone();
    }

    fn check(&self, wanted: SlotKind, index: usize) -> Result<()> {
        let actual = self.kind.slot_kind();
        if actual != wanted {
            return Err(Error::value_kind(&self.name, wanted.name(), actual.name()));
        }
        if index >= self.dimensions() {
            return Err(Error::bad_index(&self.name, index));
        }
        Ok(())
    }
}

/// Ordered, append-only collection of uniquely named parameters.
///
/// Parameters are boxed individually so that appending never moves an
/// existing parameter.
#[derive(Debug, Default)]
pub struct ParameterSet {
    parameters: Vec<Box<Parameter>>,
    effect_properties: Option<SharedPropertySet>,
}

impl ParameterSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty parameter set referring to an effect's properties.
    pub fn with_effect_properties(effect_properties: SharedPropertySet) -> Self {
        Self {
            parameters: Vec::new(),
            effect_properties: Some(effect_properties),
        }
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Check if the set has no parameter.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Index of the first parameter with this exact name.
    pub fn find_parameter(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }

    /// Index of the parameter with this name, appending it if missing.
    pub fn ensure_parameter(&mut self, name: &str) -> usize {
        if let Some(index) = self.find_parameter(name) {
            return index;
        }
        self.parameters.push(Box::new(Parameter::new(name)));
        self.parameters.len() - 1
    }

    /// Get a parameter by index.
    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.parameters.get(index).map(|p| &**p)
    }

    /// Get a parameter by index for modification.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Parameter> {
        self.parameters.get_mut(index).map(|p| &mut **p)
    }

    /// Get a parameter by name.
    pub fn by_name(&self, name: &str) -> Result<&Parameter> {
        self.find_parameter(name)
            .and_then(|i| self.get(i))
            .ok_or_else(|| Error::ParameterNotFound(name.to_string()))
    }

    /// Get a parameter by name for modification.
    pub fn by_name_mut(&mut self, name: &str) -> Result<&mut Parameter> {
        let index = self
            .find_parameter(name)
            .ok_or_else(|| Error::ParameterNotFound(name.to_string()))?;
        Ok(&mut *self.parameters[index])
    }

    /// Iterate over parameters in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().map(|p| &**p)
    }

    /// Parameter names in definition order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(Parameter::name).collect()
    }

    /// Properties of the effect this set belongs to.
    pub fn effect_properties(&self) -> Option<&SharedPropertySet> {
        self.effect_properties.as_ref()
    }

    /// Append deep copies of every parameter of `other`.
    ///
    /// The effect property set reference is copied as is: both sets then
    /// refer to the same effect properties. Fails without modifying `self`
    /// if a name of `other` is already present.
    pub fn deep_copy_from(&mut self, other: &ParameterSet) -> Result<()> {
        if let Some(duplicate) = other.iter().find(|p| self.find_parameter(&p.name).is_some()) {
            return Err(Error::AlreadyExists(format!("parameter {}", duplicate.name)));
        }

        let start = self.parameters.len();
        self.parameters
            .extend((0..other.len()).map(|_| Box::new(Parameter::new(String::new()))));
        for (target, source) in self.parameters[start..].iter_mut().zip(other.iter()) {
            target.deep_copy_from(source);
        }
        self.effect_properties = other.effect_properties.clone();
        Ok(())
    }

    /// Check whether this set refers to the given effect properties.
    pub fn shares_effect_properties(&self, properties: &SharedPropertySet) -> bool {
        self.effect_properties
            .as_ref()
            .map_or(false, |own| Arc::ptr_eq(own, properties))
    }

    /// Define a parameter: find or create it, set its type and label it.
    pub fn define(&mut self, kind: ParameterType, name: &str) -> Result<&mut Parameter> {
        if kind == ParameterType::Unknown {
            return Err(Error::UnknownParameterType(name.to_string()));
        }

        let index = self.ensure_parameter(name);
        let param = &mut self.parameters[index];
        param.set_type(kind);
        param.properties.set_string(keys::NAME, 0, name)?;
        param.properties.set_string(keys::PARAM_TYPE, 0, kind.as_str())?;
        Ok(&mut **param)
    }
}

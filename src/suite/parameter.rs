use crate::error::{Error, Result};
use crate::parameter::{Parameter, ParameterSet, ParameterType};
use crate::property::{PropertySet, SharedPropertySet};

/// Parameter suite, version 1.
pub struct ParameterSuiteV1 {
    /// Define a parameter from a type keyword; returns its properties.
    pub param_define:
        for<'a> fn(&'a mut ParameterSet, &str, &str) -> Result<&'a mut PropertySet>,
    /// Look up a parameter by name.
    pub param_get_handle: for<'a> fn(&'a mut ParameterSet, &str) -> Result<&'a mut Parameter>,
    /// Properties of the effect owning the set.
    pub param_set_get_property_set: fn(&ParameterSet) -> Result<SharedPropertySet>,
    /// Properties of a parameter.
    pub param_get_property_set: fn(&mut Parameter) -> &mut PropertySet,
    /// Read an integer component.
    pub param_get_int: fn(&Parameter, usize) -> Result<i32>,
    /// Write an integer component.
    pub param_set_int: fn(&mut Parameter, usize, i32) -> Result<()>,
    /// Read a double component.
    pub param_get_double: fn(&Parameter, usize) -> Result<f64>,
    /// Write a double component.
    pub param_set_double: fn(&mut Parameter, usize, f64) -> Result<()>,
    /// Read a boolean value.
    pub param_get_bool: fn(&Parameter) -> Result<bool>,
    /// Write a boolean value.
    pub param_set_bool: fn(&mut Parameter, bool) -> Result<()>,
    /// Read a string value.
    pub param_get_string: fn(&Parameter) -> Result<&str>,
    /// Write a string value.
    pub param_set_string: fn(&mut Parameter, &str) -> Result<()>,
}

/// The parameter suite table.
pub static PARAMETER_SUITE_V1: ParameterSuiteV1 = ParameterSuiteV1 {
    param_define,
    param_get_handle: ParameterSet::by_name_mut,
    param_set_get_property_set,
    param_get_property_set: Parameter::properties_mut,
    param_get_int: Parameter::get_int,
    param_set_int: Parameter::set_int,
    param_get_double: Parameter::get_double,
    param_set_double: Parameter::set_double,
    param_get_bool: Parameter::get_bool,
    param_set_bool: Parameter::set_bool,
    param_get_string: Parameter::get_string,
    param_set_string: Parameter::set_string,
};

fn param_define<'a>(
    set: &'a mut ParameterSet,
    kind: &str,
    name: &str,
) -> Result<&'a mut PropertySet> {
    set.define(ParameterType::parse(kind), name)
        .map(Parameter::properties_mut)
}

fn param_set_get_property_set(set: &ParameterSet) -> Result<SharedPropertySet> {
    set.effect_properties()
        .cloned()
        .ok_or_else(|| Error::bad_handle("parameter set has no effect properties"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{keys, PropertyContext};
    use crate::Status;

    #[test]
    fn test_define_and_access() {
        let suite = &PARAMETER_SUITE_V1;
        let mut set = ParameterSet::new();

        let props = (suite.param_define)(&mut set, "OfxParamTypeInteger", "count").unwrap();
        props.set_string(keys::LABEL, 0, "Count").unwrap();

        let param = (suite.param_get_handle)(&mut set, "count").unwrap();
        (suite.param_set_int)(param, 0, 7).unwrap();
        assert_eq!((suite.param_get_int)(param, 0).unwrap(), 7);
        assert_eq!(
            (suite.param_get_property_set)(param).get_string(keys::LABEL, 0).unwrap(),
            "Count"
        );
    }

    #[test]
    fn test_define_unknown_type() {
        let mut set = ParameterSet::new();
        let err = (PARAMETER_SUITE_V1.param_define)(&mut set, "OfxParamTypeBogus", "x").unwrap_err();
        assert_eq!(err.status(), Status::ErrUnknown);
        assert!(set.is_empty());
    }

    #[test]
    fn test_redefine_retypes() {
        let suite = &PARAMETER_SUITE_V1;
        let mut set = ParameterSet::new();

        (suite.param_define)(&mut set, "OfxParamTypeDouble", "name").unwrap();
        (suite.param_define)(&mut set, "OfxParamTypeString", "name").unwrap();
        assert_eq!(set.len(), 1);

        let param = (suite.param_get_handle)(&mut set, "name").unwrap();
        (suite.param_set_string)(param, "suzanne").unwrap();
        assert_eq!((suite.param_get_string)(param).unwrap(), "suzanne");
    }

    #[test]
    fn test_missing_handles() {
        let suite = &PARAMETER_SUITE_V1;
        let mut set = ParameterSet::new();

        let err = (suite.param_get_handle)(&mut set, "missing").unwrap_err();
        assert_eq!(err.status(), Status::ErrBadHandle);
        let err = (suite.param_set_get_property_set)(&set).unwrap_err();
        assert_eq!(err.status(), Status::ErrBadHandle);

        let effect = PropertySet::new(PropertyContext::MeshEffect).into_shared();
        let set = ParameterSet::with_effect_properties(effect.clone());
        let shared = (suite.param_set_get_property_set)(&set).unwrap();
        assert!(std::sync::Arc::ptr_eq(&shared, &effect));
    }
}

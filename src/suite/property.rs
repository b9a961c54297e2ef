use crate::error::Result;
use crate::property::{Opaque, PropertySet};

/// Property suite, version 1.
pub struct PropertySuiteV1 {
    /// Set a pointer slot.
    pub set_pointer: fn(&mut PropertySet, &str, usize, Opaque) -> Result<()>,
    /// Set a string slot.
    pub set_string: fn(&mut PropertySet, &str, usize, &str) -> Result<()>,
    /// Set a double slot.
    pub set_double: fn(&mut PropertySet, &str, usize, f64) -> Result<()>,
    /// Set an int slot.
    pub set_int: fn(&mut PropertySet, &str, usize, i32) -> Result<()>,
    /// Set the leading double slots.
    pub set_double_n: fn(&mut PropertySet, &str, &[f64]) -> Result<()>,
    /// Set the leading int slots.
    pub set_int_n: fn(&mut PropertySet, &str, &[i32]) -> Result<()>,
    /// Get a pointer slot.
    pub get_pointer: fn(&PropertySet, &str, usize) -> Result<Opaque>,
    /// Get a string slot.
    pub get_string: for<'a> fn(&'a PropertySet, &str, usize) -> Result<&'a str>,
    /// Get a double slot.
    pub get_double: fn(&PropertySet, &str, usize) -> Result<f64>,
    /// Get an int slot.
    pub get_int: fn(&PropertySet, &str, usize) -> Result<i32>,
    /// Get the leading double slots.
    pub get_double_n: fn(&PropertySet, &str, usize) -> Result<Vec<f64>>,
    /// Get the leading int slots.
    pub get_int_n: fn(&PropertySet, &str, usize) -> Result<Vec<i32>>,
    /// Clear every slot of a property.
    pub reset: fn(&mut PropertySet, &str) -> Result<()>,
    /// Number of slots in use.
    pub get_dimension: fn(&PropertySet, &str) -> Result<usize>,
}

/// The property suite table.
pub static PROPERTY_SUITE_V1: PropertySuiteV1 = PropertySuiteV1 {
    set_pointer: PropertySet::set_pointer,
    set_string: PropertySet::set_string,
    set_double: PropertySet::set_double,
    set_int: PropertySet::set_int,
    set_double_n: PropertySet::set_double_n,
    set_int_n: PropertySet::set_int_n,
    get_pointer: PropertySet::get_pointer,
    get_string: PropertySet::get_string,
    get_double: PropertySet::get_double,
    get_int: PropertySet::get_int,
    get_double_n: PropertySet::get_double_n,
    get_int_n: PropertySet::get_int_n,
    reset: PropertySet::reset,
    get_dimension: PropertySet::dimension,
};

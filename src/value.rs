//! The in-memory JSON value tree.
//!
//! A [`Value`] is produced by a successful parse and consumed by the
//! serializer. It owns its children outright: arrays and objects hold
//! their elements by value, with no back-references or shared state, so a
//! tree can be moved between threads freely.
//!
//! Numbers keep three distinct representations. A literal with a fraction
//! or exponent becomes [`Value::Double`]; an integer literal becomes
//! [`Value::Int`] when negative and [`Value::UInt`] otherwise, preserving
//! the full 64-bit range that a double would silently truncate.
//!
//! Objects are [`BTreeMap`]s: keys are unique (a duplicate key in the
//! source overwrites the earlier entry) and iterate in ascending byte-wise
//! order, which is also the serialization order. Output is therefore
//! deterministic and independent of source ordering.

use std::collections::BTreeMap;

/// A single JSON value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// JSON null literal.
    #[default]
    Null,
    /// JSON boolean.
    Bool(bool),
    /// Number lexed with a leading minus and no fraction or exponent.
    Int(i64),
    /// Number lexed with no sign, fraction or exponent; covers the full
    /// unsigned 64-bit range up to 18446744073709551615.
    UInt(u64),
    /// Number lexed with a fraction or exponent.
    Double(f64),
    /// String, guaranteed valid UTF-8 after escape decoding.
    String(String),
    /// Array of values in document order; duplicates permitted.
    Array(Vec<Value>),
    /// Object with unique keys in ascending byte-wise order.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns true for any of the three numeric representations.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::Double(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns the boolean if this is a Bool, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an i64 if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Returns the value as a u64 if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(n) => Some(*n),
            Value::Int(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Returns the double if this is a Double, None otherwise. Integer
    /// variants are not converted; use [`Value::as_i64`]/[`Value::as_u64`]
    /// for those.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the elements if this is an Array.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a reference to the entries if this is an Object.
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get an object member by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Get an array element by index.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(arr) => arr.get(index),
            _ => None,
        }
    }

    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::UInt(_) | Value::Double(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

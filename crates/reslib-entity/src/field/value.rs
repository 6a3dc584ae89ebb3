//! Field values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The value carried by a resource field.
///
/// Serialized untagged, so the JSON form is the plain value. Integers are
/// kept distinct from floating point numbers; subresource quantities are
/// always stored as [`FieldValue::Integer`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON `null`.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Integer(i64),
    /// A non-integral or out-of-range number.
    Number(f64),
    /// A string.
    Text(String),
    /// A list of values.
    List(Vec<FieldValue>),
    /// A string-keyed map of values.
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Whether the value counts as empty for a required field.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
            Self::Bool(_) | Self::Integer(_) | Self::Number(_) => false,
        }
    }

    /// Interpret the value as a non-negative quantity.
    ///
    /// Integral floats such as `3.0` are accepted. Negative, fractional and
    /// non-numeric values yield `None`.
    pub fn as_quantity(&self) -> Option<i64> {
        match self {
            Self::Integer(n) if *n >= 0 => Some(*n),
            Self::Number(f)
                if f.is_finite() && f.fract() == 0.0 && *f >= 0.0 && *f <= i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            _ => None,
        }
    }

    /// Return the stored integer, if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

//! Field and field schema models.

use serde::{Deserialize, Serialize};

use super::kind::FieldKind;
use super::value::FieldValue;

/// The structural part of a field: key, kind and required flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Key, unique within one template or resource.
    pub key: String,
    /// Kind tag.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Whether the field must be present (and non-empty for non-subresource kinds).
    #[serde(default)]
    pub required: bool,
}

/// A typed attribute of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Key, unique within one resource.
    pub key: String,
    /// Kind tag.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Whether the field is required.
    #[serde(default)]
    pub required: bool,
    /// Current value. For subresource fields this is the remaining quantity.
    #[serde(default)]
    pub value: FieldValue,
}

impl Field {
    /// Build a subresource field holding `quantity`.
    pub fn subresource(key: impl Into<String>, quantity: i64, required: bool) -> Self {
        Self {
            key: key.into(),
            kind: FieldKind::Subresource,
            required,
            value: FieldValue::Integer(quantity),
        }
    }

    /// The structural part of this field.
    pub fn schema(&self) -> FieldSchema {
        FieldSchema {
            key: self.key.clone(),
            kind: self.kind.clone(),
            required: self.required,
        }
    }

    /// Whether key, kind and required flag equal the schema's.
    pub fn matches_schema(&self, schema: &FieldSchema) -> bool {
        self.key == schema.key && self.kind == schema.kind && self.required == schema.required
    }

    /// Whether this is a subresource field.
    pub fn is_subresource(&self) -> bool {
        self.kind.is_subresource()
    }

    /// Remaining quantity of a subresource field.
    pub fn quantity(&self) -> Option<i64> {
        if self.is_subresource() {
            self.value.as_integer()
        } else {
            None
        }
    }
}

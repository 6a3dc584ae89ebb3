//! Equality filters over top-level document fields.
//!
//! A [`Filter`] is a conjunction of conditions. Both store backends
//! evaluate the same semantics: the in-memory store matches against the
//! serialized document, the Postgres store renders the filter as a JSONB
//! containment document (`doc @> $1`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// The field equals the value.
    Eq,
    /// The field is an array that contains the value.
    Contains,
}

/// A single filter condition on a named top-level field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The document field name.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: Value,
}

impl FilterField {
    /// Whether the serialized document satisfies this condition.
    pub fn matches(&self, doc: &Value) -> bool {
        let Some(actual) = doc.get(&self.field) else {
            return false;
        };
        match self.op {
            FilterOp::Eq => actual == &self.value,
            FilterOp::Contains => actual
                .as_array()
                .is_some_and(|items| items.contains(&self.value)),
        }
    }
}

/// A conjunction of filter conditions. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Conditions that must all hold.
    pub fields: Vec<FilterField>,
}

impl Filter {
    /// A filter that matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Shorthand for a single equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(field, value)
    }

    /// Shorthand for a single array-contains filter.
    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_contains(field, value)
    }

    /// Add an equality condition.
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(FilterField {
            field: field.into(),
            op: FilterOp::Eq,
            value: value.into(),
        });
        self
    }

    /// Add an array-contains condition.
    pub fn and_contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(FilterField {
            field: field.into(),
            op: FilterOp::Contains,
            value: value.into(),
        });
        self
    }

    /// Whether the serialized document satisfies every condition.
    pub fn matches(&self, doc: &Value) -> bool {
        self.fields.iter().all(|f| f.matches(doc))
    }

    /// Render the filter as a JSONB containment document.
    ///
    /// Conditions on the same field are merged; `Contains` conditions on
    /// one field accumulate into a single array.
    pub fn to_containment(&self) -> Value {
        let mut doc = Map::new();
        for f in &self.fields {
            match f.op {
                FilterOp::Eq => {
                    doc.insert(f.field.clone(), f.value.clone());
                }
                FilterOp::Contains => {
                    let entry = doc
                        .entry(f.field.clone())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if let Value::Array(items) = entry {
                        items.push(f.value.clone());
                    }
                }
            }
        }
        Value::Object(doc)
    }
}

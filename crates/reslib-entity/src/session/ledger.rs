//! Subresource consumption ledger entries.

use serde::{Deserialize, Serialize};

use reslib_core::types::ResourceId;

/// Quantity of one subresource drawn by a session.
///
/// At most one entry exists per (parent resource, key) pair and its amount
/// is always at least one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    /// The resource holding the subresource field.
    #[serde(alias = "parentid")]
    pub parent_id: ResourceId,
    /// Subresource field key.
    pub key: String,
    /// Units drawn.
    pub amount: u32,
}

impl Consumption {
    /// Whether this entry tracks the given (resource, key) pair.
    pub fn is_for(&self, parent_id: ResourceId, key: &str) -> bool {
        self.parent_id == parent_id && self.key == key
    }
}

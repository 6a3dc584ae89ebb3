//! Logical document collections.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A logical collection of documents.
///
/// The declaration order of the lockable collections is the canonical
/// global lock order: Templates, Projects, Resources, Sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Resource templates.
    Templates,
    /// Projects and their API keys.
    Projects,
    /// Leasable resources.
    Resources,
    /// Lease sessions.
    Sessions,
    /// Singleton global settings (signing key).
    Settings,
}

impl Collection {
    /// Collections guarded by the collection lock set, in canonical order.
    pub const LOCKABLE: [Collection; 4] = [
        Collection::Templates,
        Collection::Projects,
        Collection::Resources,
        Collection::Sessions,
    ];

    /// Backing table / collection name.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Templates => "templates",
            Self::Projects => "projects",
            Self::Resources => "resources",
            Self::Sessions => "sessions",
            Self::Settings => "settings",
        }
    }

    /// Position in the canonical lock order, or `None` if not lockable.
    pub fn lock_rank(&self) -> Option<usize> {
        Self::LOCKABLE.iter().position(|c| c == self)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

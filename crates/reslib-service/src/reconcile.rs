//! Set-difference reconciliation of resource-project associations.

use reslib_core::types::ProjectId;

/// Projects that lose and gain a resource when its association list
/// changes from `old` to `new`. Projects in both lists are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationDiff {
    pub removed: Vec<ProjectId>,
    pub added: Vec<ProjectId>,
}

impl AssociationDiff {
    pub fn between(old: &[ProjectId], new: &[ProjectId]) -> Self {
        Self {
            removed: old.iter().filter(|p| !new.contains(p)).copied().collect(),
            added: new.iter().filter(|p| !old.contains(p)).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

//! Reports of cascaded association updates.

use serde::{Deserialize, Serialize};

use reslib_core::types::{ProjectId, ResourceId};
use reslib_lease::CompensationFailure;

/// What a project or resource delete did to the other side of the
/// association, and which references it could not follow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    /// Resources left with no project and therefore deleted.
    pub deleted_resources: Vec<ResourceId>,
    /// Resources that lost an association but survive.
    pub updated_resources: Vec<ResourceId>,
    /// Projects that lost an association.
    pub updated_projects: Vec<ProjectId>,
    /// Dangling references encountered along the way.
    pub failures: Vec<CompensationFailure>,
}

impl CascadeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

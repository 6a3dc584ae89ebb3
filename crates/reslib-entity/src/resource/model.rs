//! Resource document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reslib_core::traits::Document;
use reslib_core::types::{Collection, ProjectId, ResourceId, TemplateId};

use crate::field::Field;

/// A leasable resource instantiated from a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: ResourceId,
    /// Unique resource name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// The template this resource was created from.
    #[serde(alias = "templateid")]
    pub template_id: TemplateId,
    /// Associated projects.
    #[serde(default)]
    pub projects: Vec<ProjectId>,
    /// Ordered fields matching the template structure.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Number of live sessions holding this resource checked out.
    #[serde(default, alias = "checkedout")]
    pub checked_out: u32,
    /// Whether the resource is active.
    #[serde(default = "default_true")]
    pub active: bool,
    /// When the resource was created.
    pub created_at: DateTime<Utc>,
    /// When the resource was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    /// Build a new, active, not-checked-out resource.
    pub fn new(
        name: String,
        description: String,
        template_id: TemplateId,
        projects: Vec<ProjectId>,
        fields: Vec<Field>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ResourceId::new(),
            name,
            description,
            template_id,
            projects,
            fields,
            checked_out: 0,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether any session currently holds this resource.
    pub fn is_checked_out(&self) -> bool {
        self.checked_out > 0
    }

    /// Record one more holder.
    pub fn lease(&mut self) {
        self.checked_out = self.checked_out.saturating_add(1);
        self.touch();
    }

    /// Record one fewer holder. Never goes below zero.
    pub fn unlease(&mut self) {
        self.checked_out = self.checked_out.saturating_sub(1);
        self.touch();
    }

    /// Find a field by key.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Find a subresource field by key.
    pub fn subresource_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields
            .iter_mut()
            .find(|f| f.is_subresource() && f.key == key)
    }

    /// Add `delta` to a subresource quantity.
    ///
    /// Returns the new quantity, or `None` if no subresource field with that
    /// key holds an integer.
    pub fn adjust_quantity(&mut self, key: &str, delta: i64) -> Option<i64> {
        let field = self.subresource_mut(key)?;
        let next = field.quantity()?.checked_add(delta)?;
        field.value = next.into();
        self.touch();
        Some(next)
    }

    /// Whether the project is associated with this resource.
    pub fn has_project(&self, id: ProjectId) -> bool {
        self.projects.contains(&id)
    }

    /// Associate a project. No-op if already associated.
    pub fn add_project(&mut self, id: ProjectId) {
        if !self.has_project(id) {
            self.projects.push(id);
            self.touch();
        }
    }

    /// Remove a project association. Returns whether it was present.
    pub fn remove_project(&mut self, id: ProjectId) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| *p != id);
        let removed = self.projects.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Mark the document as modified.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for Resource {
    const COLLECTION: Collection = Collection::Resources;
    type Id = ResourceId;

    fn id(&self) -> ResourceId {
        self.id
    }
}

/// Data required to create a resource.
///
/// Identifiers arrive as strings and are validated by the resource service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInput {
    /// Resource name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Template to instantiate.
    #[serde(alias = "templateid")]
    pub template_id: String,
    /// Projects to associate with.
    #[serde(default)]
    pub projects: Vec<String>,
    /// Fields, in template order.
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// Data required to update a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceUpdate {
    /// New name.
    pub name: String,
    /// New description.
    #[serde(default)]
    pub description: String,
    /// New project associations.
    #[serde(default)]
    pub projects: Vec<String>,
    /// New fields, in existing field order.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// New active flag; unchanged when absent.
    #[serde(default)]
    pub active: Option<bool>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, FieldValue};

    fn resource() -> Resource {
        Resource::new(
            "printer".into(),
            String::new(),
            TemplateId::new(),
            vec![ProjectId::new()],
            vec![
                Field::subresource("tickets", 2, true),
                Field {
                    key: "color".into(),
                    kind: FieldKind::Value,
                    required: false,
                    value: FieldValue::Text("red".into()),
                },
            ],
        )
    }

    #[test]
    fn test_lease_counter_never_negative() {
        let mut r = resource();
        r.unlease();
        assert_eq!(r.checked_out, 0);
        r.lease();
        r.lease();
        r.unlease();
        assert_eq!(r.checked_out, 1);
    }

    #[test]
    fn test_adjust_quantity_only_touches_subresources() {
        let mut r = resource();
        assert_eq!(r.adjust_quantity("tickets", -1), Some(1));
        assert_eq!(r.adjust_quantity("tickets", 3), Some(4));
        assert_eq!(r.adjust_quantity("color", 1), None);
        assert_eq!(r.adjust_quantity("missing", 1), None);
    }

    #[test]
    fn test_project_association() {
        let mut r = resource();
        let p = r.projects[0];
        assert!(r.remove_project(p));
        assert!(r.projects.is_empty());
        r.add_project(p);
        r.add_project(p);
        assert_eq!(r.projects, vec![p]);
    }
}

//! Template document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reslib_core::traits::Document;
use reslib_core::types::{Collection, TemplateId};

use crate::field::FieldSchema;

/// A resource template: the structural contract resources instantiate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Unique template identifier.
    pub id: TemplateId,
    /// Unique template name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Ordered field schemas.
    pub fields: Vec<FieldSchema>,
    /// When the template was created.
    pub created_at: DateTime<Utc>,
    /// When the template was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Build a new template from validated input.
    pub fn new(input: TemplateInput) -> Self {
        let now = Utc::now();
        Self {
            id: TemplateId::new(),
            name: input.name,
            description: input.description,
            fields: input.fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the mutable parts with `input`.
    pub fn apply(&mut self, input: TemplateInput) {
        self.name = input.name;
        self.description = input.description;
        self.fields = input.fields;
        self.updated_at = Utc::now();
    }
}

impl Document for Template {
    const COLLECTION: Collection = Collection::Templates;
    type Id = TemplateId;

    fn id(&self) -> TemplateId {
        self.id
    }
}

/// Data required to create or replace a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInput {
    /// Template name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Field schemas. Any `value` members in the request are ignored.
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

//! Project document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reslib_core::traits::Document;
use reslib_core::types::{Collection, ProjectId, ResourceId};

/// A project-level key/value setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSetting {
    /// Setting key.
    pub key: String,
    /// Setting value (any JSON).
    #[serde(default)]
    pub value: serde_json::Value,
}

/// A project: the owner of sessions and an API key.
///
/// The project's `resources` list and each listed resource's `projects`
/// list are kept mutually consistent by the catalog services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Unique project name.
    pub name: String,
    /// Credential presented to open a session.
    #[serde(alias = "apikey")]
    pub api_key: String,
    /// Associated resources, in association order.
    #[serde(default)]
    pub resources: Vec<ResourceId>,
    /// Arbitrary settings.
    #[serde(default)]
    pub settings: Vec<ProjectSetting>,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Build a new project with the given API key.
    pub fn new(input: ProjectInput, api_key: String) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            name: input.name,
            api_key,
            resources: Vec::new(),
            settings: input.settings,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace name and settings.
    pub fn apply(&mut self, input: ProjectInput) {
        self.name = input.name;
        self.settings = input.settings;
        self.touch();
    }

    /// Replace the API key.
    pub fn rotate_key(&mut self, api_key: String) {
        self.api_key = api_key;
        self.touch();
    }

    /// Whether the resource is associated with this project.
    pub fn has_resource(&self, id: ResourceId) -> bool {
        self.resources.contains(&id)
    }

    /// Associate a resource. No-op if already associated.
    pub fn add_resource(&mut self, id: ResourceId) {
        if !self.has_resource(id) {
            self.resources.push(id);
            self.touch();
        }
    }

    /// Remove a resource association. Returns whether it was present.
    pub fn remove_resource(&mut self, id: ResourceId) -> bool {
        let before = self.resources.len();
        self.resources.retain(|r| *r != id);
        let removed = self.resources.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for Project {
    const COLLECTION: Collection = Collection::Projects;
    type Id = ProjectId;

    fn id(&self) -> ProjectId {
        self.id
    }
}

/// Data required to create or update a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInput {
    /// Project name.
    pub name: String,
    /// Settings.
    #[serde(default)]
    pub settings: Vec<ProjectSetting>,
}

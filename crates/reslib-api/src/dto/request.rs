//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use reslib_core::error::AppError;
use reslib_entity::{
    Field, FieldSchema, ProjectInput, ProjectSetting, ResourceInput, ResourceUpdate, TemplateInput,
};

/// Run the derived validation rules, reporting the first failure as an
/// invalid request.
pub fn validate_request<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))
}

/// Template create/update body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TemplateRequest {
    /// Template name.
    #[validate(length(min = 1, message = "template name cannot be blank"))]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Field schemas.
    #[validate(length(min = 1, message = "fields cannot be blank"))]
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl From<TemplateRequest> for TemplateInput {
    fn from(req: TemplateRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            fields: req.fields,
        }
    }
}

/// Project create/update body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectRequest {
    /// Project name.
    #[validate(length(min = 1, message = "project name cannot be blank"))]
    pub name: String,
    /// Settings.
    #[serde(default)]
    pub settings: Vec<ProjectSetting>,
}

impl From<ProjectRequest> for ProjectInput {
    fn from(req: ProjectRequest) -> Self {
        Self {
            name: req.name,
            settings: req.settings,
        }
    }
}

/// Resource create body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateResourceRequest {
    /// Resource name.
    #[validate(length(min = 1, message = "resource name cannot be blank"))]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Template to instantiate.
    #[serde(alias = "templateid")]
    #[validate(length(min = 1, message = "template id cannot be blank"))]
    pub template_id: String,
    /// Associated project IDs.
    #[serde(default)]
    pub projects: Vec<String>,
    /// Field values in template order.
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl From<CreateResourceRequest> for ResourceInput {
    fn from(req: CreateResourceRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            template_id: req.template_id,
            projects: req.projects,
            fields: req.fields,
        }
    }
}

/// Resource update body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateResourceRequest {
    /// Resource name.
    #[validate(length(min = 1, message = "resource name cannot be blank"))]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Associated project IDs.
    #[serde(default)]
    pub projects: Vec<String>,
    /// Field values in existing order.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Active flag.
    pub active: Option<bool>,
}

impl From<UpdateResourceRequest> for ResourceUpdate {
    fn from(req: UpdateResourceRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            projects: req.projects,
            fields: req.fields,
            active: req.active,
        }
    }
}

/// Session create body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    /// Project API key.
    #[serde(alias = "apikey")]
    #[validate(length(min = 1, message = "apikey cannot be blank"))]
    pub api_key: String,
}

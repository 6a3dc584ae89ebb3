//! Template CRUD.

use std::sync::Arc;

use tracing::info;

use reslib_core::error::AppError;
use reslib_core::result::AppResult;
use reslib_core::types::{Collection, Filter, TemplateId};
use reslib_database::Stores;
use reslib_entity::{Template, TemplateInput};
use reslib_lease::CollectionLocks;

use crate::validation;

const TEMPLATE_NOT_FOUND: &str = "template not found";
const TEMPLATE_EXISTS: &str = "template with this name already exists";

/// Manages resource templates.
#[derive(Debug, Clone)]
pub struct TemplateService {
    stores: Stores,
    locks: Arc<CollectionLocks>,
}

impl TemplateService {
    /// Creates a new template service.
    pub fn new(stores: Stores, locks: Arc<CollectionLocks>) -> Self {
        Self { stores, locks }
    }

    /// Creates a template. Names are unique.
    pub async fn create(&self, input: TemplateInput) -> AppResult<Template> {
        validation::validate_template(&input)?;
        let _guard = self.locks.acquire(&[Collection::Templates]).await;

        if self.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::conflict(TEMPLATE_EXISTS));
        }

        let template = Template::new(input);
        self.stores.templates.insert(&template).await?;

        info!(template_id = %template.id, name = %template.name, "Template created");
        Ok(template)
    }

    /// Lists all templates in creation order.
    pub async fn list(&self) -> AppResult<Vec<Template>> {
        let _guard = self.locks.acquire(&[Collection::Templates]).await;
        let templates = self.stores.templates.find_all(&Filter::all()).await?;
        if templates.is_empty() {
            return Err(AppError::not_found("no templates found"));
        }
        Ok(templates)
    }

    /// Gets a template by ID.
    pub async fn get(&self, id: TemplateId) -> AppResult<Template> {
        self.stores
            .templates
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(TEMPLATE_NOT_FOUND))
    }

    /// Replaces a template's name, description and fields.
    ///
    /// Existing resources keep their fields; they are validated against
    /// their own structure on update, not against the template.
    pub async fn update(&self, id: TemplateId, input: TemplateInput) -> AppResult<Template> {
        let _guard = self.locks.acquire(&[Collection::Templates]).await;

        let mut template = self.get(id).await?;
        if template.name != input.name {
            if let Some(other) = self.find_by_name(&input.name).await? {
                if other.id != id {
                    return Err(AppError::conflict(TEMPLATE_EXISTS));
                }
            }
        }
        validation::validate_template(&input)?;

        template.apply(input);
        if !self.stores.templates.update(&template).await? {
            return Err(AppError::not_found(TEMPLATE_NOT_FOUND));
        }

        info!(template_id = %id, name = %template.name, "Template updated");
        Ok(template)
    }

    /// Deletes a template.
    pub async fn delete(&self, id: TemplateId) -> AppResult<()> {
        let _guard = self.locks.acquire(&[Collection::Templates]).await;

        if !self.stores.templates.delete(id).await? {
            return Err(AppError::not_found(TEMPLATE_NOT_FOUND));
        }

        info!(template_id = %id, "Template deleted");
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Template>> {
        self.stores
            .templates
            .find_first(&Filter::eq("name", name))
            .await
    }
}

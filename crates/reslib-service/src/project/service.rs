//! Project CRUD, API key rotation and cascading delete.

use std::sync::Arc;

use tracing::{info, warn};

use reslib_core::config::auth::AuthConfig;
use reslib_core::error::AppError;
use reslib_core::keys;
use reslib_core::result::AppResult;
use reslib_core::types::{Collection, Filter, ProjectId};
use reslib_database::Stores;
use reslib_entity::{Project, ProjectInput};
use reslib_lease::{CollectionLocks, CompensationFailure};

use crate::cascade::CascadeReport;
use crate::validation;

const PROJECT_NOT_FOUND: &str = "project not found";
const PROJECT_EXISTS: &str = "project with this name already exists";

/// Manages projects and their API keys.
#[derive(Debug, Clone)]
pub struct ProjectService {
    stores: Stores,
    locks: Arc<CollectionLocks>,
    /// Random bytes per API key.
    api_key_bytes: usize,
}

impl ProjectService {
    /// Creates a new project service.
    pub fn new(stores: Stores, locks: Arc<CollectionLocks>, auth: &AuthConfig) -> Self {
        Self {
            stores,
            locks,
            api_key_bytes: auth.api_key_bytes,
        }
    }

    /// Creates a project with a fresh API key.
    pub async fn create(&self, input: ProjectInput) -> AppResult<Project> {
        validation::require_name(&input.name, validation::PROJECT_NAME_BLANK)?;
        let _guard = self.locks.acquire(&[Collection::Projects]).await;

        if self.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::conflict(PROJECT_EXISTS));
        }

        let project = Project::new(input, keys::generate_key(self.api_key_bytes));
        self.stores.projects.insert(&project).await?;

        info!(project_id = %project.id, name = %project.name, "Project created");
        Ok(project)
    }

    /// Lists all projects in creation order.
    pub async fn list(&self) -> AppResult<Vec<Project>> {
        let _guard = self.locks.acquire(&[Collection::Projects]).await;
        let projects = self.stores.projects.find_all(&Filter::all()).await?;
        if projects.is_empty() {
            return Err(AppError::not_found("no projects found"));
        }
        Ok(projects)
    }

    /// Gets a project by ID.
    pub async fn get(&self, id: ProjectId) -> AppResult<Project> {
        self.stores
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(PROJECT_NOT_FOUND))
    }

    /// Replaces a project's name and settings.
    pub async fn update(&self, id: ProjectId, input: ProjectInput) -> AppResult<Project> {
        validation::require_name(&input.name, validation::PROJECT_NAME_BLANK)?;
        let _guard = self.locks.acquire(&[Collection::Projects]).await;

        let mut project = self.get(id).await?;
        if project.name != input.name {
            if let Some(other) = self.find_by_name(&input.name).await? {
                if other.id != id {
                    return Err(AppError::conflict(PROJECT_EXISTS));
                }
            }
        }

        project.apply(input);
        self.save(&project).await?;

        info!(project_id = %id, name = %project.name, "Project updated");
        Ok(project)
    }

    /// Replaces a project's API key. Sessions already open stay valid.
    pub async fn rotate_key(&self, id: ProjectId) -> AppResult<Project> {
        let _guard = self.locks.acquire(&[Collection::Projects]).await;

        let mut project = self.get(id).await?;
        project.rotate_key(keys::generate_key(self.api_key_bytes));
        self.save(&project).await?;

        info!(project_id = %id, "Project API key rotated");
        Ok(project)
    }

    /// Deletes a project.
    ///
    /// Every listed resource loses the association; a resource left with no
    /// project is deleted. Listed resources that no longer exist are
    /// recorded in the report.
    pub async fn delete(&self, id: ProjectId) -> AppResult<CascadeReport> {
        let _guard = self
            .locks
            .acquire(&[Collection::Projects, Collection::Resources])
            .await;

        let project = self.get(id).await?;
        let mut report = CascadeReport::default();

        for &resource_id in &project.resources {
            let Some(mut resource) = self.stores.resources.find_by_id(resource_id).await? else {
                report
                    .failures
                    .push(CompensationFailure::MissingResource { resource_id });
                continue;
            };

            resource.remove_project(id);
            if resource.projects.is_empty() {
                self.stores.resources.delete(resource_id).await?;
                report.deleted_resources.push(resource_id);
            } else {
                self.stores.resources.update(&resource).await?;
                report.updated_resources.push(resource_id);
            }
        }

        if !self.stores.projects.delete(id).await? {
            return Err(AppError::not_found(PROJECT_NOT_FOUND));
        }

        if !report.is_clean() {
            warn!(project_id = %id, failures = ?report.failures, "Project delete found dangling references");
        }
        info!(
            project_id = %id,
            deleted_resources = report.deleted_resources.len(),
            updated_resources = report.updated_resources.len(),
            "Project deleted"
        );
        Ok(report)
    }

    async fn save(&self, project: &Project) -> AppResult<()> {
        if !self.stores.projects.update(project).await? {
            return Err(AppError::not_found(PROJECT_NOT_FOUND));
        }
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Project>> {
        self.stores
            .projects
            .find_first(&Filter::eq("name", name))
            .await
    }
}

//! Resource CRUD with template validation and association upkeep.

use std::sync::Arc;

use tracing::{error, info, warn};

use reslib_core::error::AppError;
use reslib_core::result::AppResult;
use reslib_core::types::{Collection, Filter, ProjectId, ResourceId, TemplateId};
use reslib_database::Stores;
use reslib_entity::{Project, Resource, ResourceInput, ResourceUpdate};
use reslib_lease::{CollectionLocks, CompensationFailure};

use crate::cascade::CascadeReport;
use crate::reconcile::AssociationDiff;
use crate::validation;

const RESOURCE_NOT_FOUND: &str = "resource not found";
const RESOURCE_EXISTS: &str = "resource with this name already exists";
const RESOURCE_CHECKED_OUT: &str =
    "resource is checked out; cannot update a checked out resource";
const TEMPLATE_NOT_FOUND: &str = "template not found";
const PROJECT_NOT_FOUND: &str = "project not found";

/// Manages resources and keeps project association lists in step.
#[derive(Debug, Clone)]
pub struct ResourceService {
    stores: Stores,
    locks: Arc<CollectionLocks>,
}

impl ResourceService {
    /// Creates a new resource service.
    pub fn new(stores: Stores, locks: Arc<CollectionLocks>) -> Self {
        Self { stores, locks }
    }

    /// Instantiates a template as a new resource.
    ///
    /// The resource is appended to every listed project's resource list.
    pub async fn create(&self, input: ResourceInput) -> AppResult<Resource> {
        validation::require_name(&input.name, validation::RESOURCE_NAME_BLANK)?;
        let _guard = self
            .locks
            .acquire(&[
                Collection::Templates,
                Collection::Projects,
                Collection::Resources,
            ])
            .await;

        if self.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::conflict(RESOURCE_EXISTS));
        }

        let template_id = TemplateId::parse(&input.template_id)?;
        let project_ids = validation::parse_project_ids(&input.projects)?;

        let template = self
            .stores
            .templates
            .find_by_id(template_id)
            .await?
            .ok_or_else(|| AppError::not_found(TEMPLATE_NOT_FOUND))?;
        let projects = self.load_projects(&project_ids).await?;

        let mut fields = input.fields;
        validation::match_structure(&template.fields, &mut fields)?;

        let resource = Resource::new(
            input.name,
            input.description,
            template_id,
            project_ids,
            fields,
        );
        self.stores.resources.insert(&resource).await?;

        let mut linked = Vec::with_capacity(projects.len());
        for project in projects {
            let mut updated = project.clone();
            updated.add_resource(resource.id);
            if let Err(e) = self.stores.projects.update(&updated).await {
                self.restore_projects(&linked).await;
                if let Err(undo) = self.stores.resources.delete(resource.id).await {
                    error!(
                        resource_id = %resource.id,
                        error = %undo,
                        "Failed to remove resource after project write failure"
                    );
                }
                return Err(e);
            }
            linked.push(project);
        }

        info!(
            resource_id = %resource.id,
            template_id = %template_id,
            name = %resource.name,
            "Resource created"
        );
        Ok(resource)
    }

    /// Lists all resources in creation order.
    pub async fn list(&self) -> AppResult<Vec<Resource>> {
        let _guard = self.locks.acquire(&[Collection::Resources]).await;
        let resources = self.stores.resources.find_all(&Filter::all()).await?;
        if resources.is_empty() {
            return Err(AppError::not_found("no resources found"));
        }
        Ok(resources)
    }

    /// Lists a project's resources in association order.
    pub async fn list_by_project(&self, project_id: ProjectId) -> AppResult<Vec<Resource>> {
        let _guard = self
            .locks
            .acquire(&[Collection::Projects, Collection::Resources])
            .await;

        let project = self
            .stores
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found(PROJECT_NOT_FOUND))?;

        let mut resources = Vec::with_capacity(project.resources.len());
        for &id in &project.resources {
            match self.stores.resources.find_by_id(id).await? {
                Some(resource) => resources.push(resource),
                None => warn!(project_id = %project_id, resource_id = %id, "Project lists a missing resource"),
            }
        }

        if resources.is_empty() {
            return Err(AppError::not_found("no resources found"));
        }
        Ok(resources)
    }

    /// Gets a resource by ID.
    pub async fn get(&self, id: ResourceId) -> AppResult<Resource> {
        self.stores
            .resources
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(RESOURCE_NOT_FOUND))
    }

    /// Updates a resource that no session holds.
    ///
    /// Fields are matched against the resource's existing structure.
    /// Changed project associations are reconciled on both sides.
    pub async fn update(&self, id: ResourceId, update: ResourceUpdate) -> AppResult<Resource> {
        let _guard = self
            .locks
            .acquire(&[Collection::Projects, Collection::Resources])
            .await;

        let previous = self.get(id).await?;
        if previous.is_checked_out() {
            return Err(AppError::conflict(RESOURCE_CHECKED_OUT));
        }

        if previous.name != update.name {
            if let Some(other) = self.find_by_name(&update.name).await? {
                if other.id != id {
                    return Err(AppError::conflict(RESOURCE_EXISTS));
                }
            }
        }
        validation::require_name(&update.name, validation::RESOURCE_NAME_BLANK)?;

        let project_ids = validation::parse_project_ids(&update.projects)?;
        self.load_projects(&project_ids).await?;

        let schema: Vec<_> = previous.fields.iter().map(|f| f.schema()).collect();
        let mut fields = update.fields;
        validation::match_structure(&schema, &mut fields)?;

        let diff = AssociationDiff::between(&previous.projects, &project_ids);

        let mut resource = previous.clone();
        resource.name = update.name;
        resource.description = update.description;
        resource.projects = project_ids;
        resource.fields = fields;
        if let Some(active) = update.active {
            resource.active = active;
        }
        resource.touch();

        if !self.stores.resources.update(&resource).await? {
            return Err(AppError::not_found(RESOURCE_NOT_FOUND));
        }

        let mut touched = Vec::new();
        if let Err(e) = self.reconcile(id, &diff, &mut touched).await {
            self.restore_projects(&touched).await;
            if let Err(undo) = self.stores.resources.update(&previous).await {
                error!(
                    resource_id = %id,
                    error = %undo,
                    "Failed to restore resource after project write failure"
                );
            }
            return Err(e);
        }

        info!(
            resource_id = %id,
            added_projects = diff.added.len(),
            removed_projects = diff.removed.len(),
            "Resource updated"
        );
        Ok(resource)
    }

    /// Deletes a resource and removes it from every project listing it.
    ///
    /// Sessions holding the resource are not touched; their teardown
    /// records the missing resource.
    pub async fn delete(&self, id: ResourceId) -> AppResult<CascadeReport> {
        let _guard = self
            .locks
            .acquire(&[Collection::Projects, Collection::Resources])
            .await;

        let resource = self.get(id).await?;
        let mut report = CascadeReport::default();

        for &project_id in &resource.projects {
            let Some(mut project) = self.stores.projects.find_by_id(project_id).await? else {
                report
                    .failures
                    .push(CompensationFailure::MissingProject { project_id });
                continue;
            };
            if project.remove_resource(id) {
                self.stores.projects.update(&project).await?;
                report.updated_projects.push(project_id);
            }
        }

        if !self.stores.resources.delete(id).await? {
            return Err(AppError::not_found(RESOURCE_NOT_FOUND));
        }

        if !report.is_clean() {
            warn!(resource_id = %id, failures = ?report.failures, "Resource delete found dangling references");
        }
        if resource.is_checked_out() {
            warn!(resource_id = %id, holders = resource.checked_out, "Deleted a checked out resource");
        }
        info!(resource_id = %id, "Resource deleted");
        Ok(report)
    }

    /// Apply an association diff to the project side.
    ///
    /// The prior state of every project written is pushed onto `touched`.
    async fn reconcile(
        &self,
        resource_id: ResourceId,
        diff: &AssociationDiff,
        touched: &mut Vec<Project>,
    ) -> AppResult<()> {
        for &project_id in &diff.removed {
            match self.stores.projects.find_by_id(project_id).await? {
                Some(project) => {
                    let mut updated = project.clone();
                    if updated.remove_resource(resource_id) {
                        self.stores.projects.update(&updated).await?;
                        touched.push(project);
                    }
                }
                None => warn!(
                    project_id = %project_id,
                    resource_id = %resource_id,
                    "Previously associated project no longer exists"
                ),
            }
        }

        for &project_id in &diff.added {
            let project = self
                .stores
                .projects
                .find_by_id(project_id)
                .await?
                .ok_or_else(|| AppError::not_found(PROJECT_NOT_FOUND))?;
            let mut updated = project.clone();
            updated.add_resource(resource_id);
            self.stores.projects.update(&updated).await?;
            touched.push(project);
        }
        Ok(())
    }

    /// Write back prior project states after a failed multi-document write.
    async fn restore_projects(&self, originals: &[Project]) {
        for project in originals {
            if let Err(e) = self.stores.projects.update(project).await {
                error!(
                    project_id = %project.id,
                    error = %e,
                    "Failed to restore project after failed resource write"
                );
            }
        }
    }

    async fn load_projects(&self, ids: &[ProjectId]) -> AppResult<Vec<Project>> {
        let mut projects = Vec::with_capacity(ids.len());
        for &id in ids {
            let project = self
                .stores
                .projects
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found(PROJECT_NOT_FOUND))?;
            projects.push(project);
        }
        Ok(projects)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Resource>> {
        self.stores
            .resources
            .find_first(&Filter::eq("name", name))
            .await
    }
}

//! Project handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use reslib_core::types::ProjectId;
use reslib_entity::Project;

use crate::dto::request::{ProjectRequest, validate_request};
use crate::dto::response::{ApiResponse, DeletedResponse};
use crate::error::ApiError;
use crate::extractors::IdPath;
use crate::state::AppState;

/// POST /v1/project
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<ProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), ApiError> {
    validate_request(&req)?;
    let project = state.project_service.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(project))))
}

/// GET /v1/project
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = state.project_service.list().await?;
    Ok(Json(ApiResponse::ok(projects)))
}

/// PUT /v1/project/{id}
pub async fn update_project(
    State(state): State<AppState>,
    IdPath(id): IdPath<ProjectId>,
    Json(req): Json<ProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    validate_request(&req)?;
    let project = state.project_service.update(id, req.into()).await?;
    Ok(Json(ApiResponse::ok(project)))
}

/// PUT /v1/project/{id}/newkey
pub async fn rotate_key(
    State(state): State<AppState>,
    IdPath(id): IdPath<ProjectId>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = state.project_service.rotate_key(id).await?;
    Ok(Json(ApiResponse::ok(project)))
}

/// DELETE /v1/project/{id}
pub async fn delete_project(
    State(state): State<AppState>,
    IdPath(id): IdPath<ProjectId>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let cascade = state.project_service.delete(id).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse {
        message: "project deleted successfully".to_string(),
        cascade,
    })))
}

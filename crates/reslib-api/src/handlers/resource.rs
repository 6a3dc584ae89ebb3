//! Resource handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use reslib_core::types::{ProjectId, ResourceId};
use reslib_entity::Resource;

use crate::dto::request::{CreateResourceRequest, UpdateResourceRequest, validate_request};
use crate::dto::response::{ApiResponse, DeletedResponse};
use crate::error::ApiError;
use crate::extractors::IdPath;
use crate::state::AppState;

/// POST /v1/resource
pub async fn create_resource(
    State(state): State<AppState>,
    Json(req): Json<CreateResourceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Resource>>), ApiError> {
    validate_request(&req)?;
    let resource = state.resource_service.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(resource))))
}

/// GET /v1/resource
pub async fn list_resources(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Resource>>>, ApiError> {
    let resources = state.resource_service.list().await?;
    Ok(Json(ApiResponse::ok(resources)))
}

/// GET /v1/resource/{project_id}
pub async fn list_project_resources(
    State(state): State<AppState>,
    IdPath(project_id): IdPath<ProjectId>,
) -> Result<Json<ApiResponse<Vec<Resource>>>, ApiError> {
    let resources = state.resource_service.list_by_project(project_id).await?;
    Ok(Json(ApiResponse::ok(resources)))
}

/// PUT /v1/resource/{id}
pub async fn update_resource(
    State(state): State<AppState>,
    IdPath(id): IdPath<ResourceId>,
    Json(req): Json<UpdateResourceRequest>,
) -> Result<Json<ApiResponse<Resource>>, ApiError> {
    validate_request(&req)?;
    let resource = state.resource_service.update(id, req.into()).await?;
    Ok(Json(ApiResponse::ok(resource)))
}

/// DELETE /v1/resource/{id}
pub async fn delete_resource(
    State(state): State<AppState>,
    IdPath(id): IdPath<ResourceId>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let cascade = state.resource_service.delete(id).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse {
        message: "resource deleted successfully".to_string(),
        cascade,
    })))
}

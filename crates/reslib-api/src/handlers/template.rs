//! Template handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use reslib_core::types::TemplateId;
use reslib_entity::Template;

use crate::dto::request::{TemplateRequest, validate_request};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::IdPath;
use crate::state::AppState;

/// POST /v1/template
pub async fn create_template(
    State(state): State<AppState>,
    Json(req): Json<TemplateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Template>>), ApiError> {
    validate_request(&req)?;
    let template = state.template_service.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(template))))
}

/// GET /v1/template
pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Template>>>, ApiError> {
    let templates = state.template_service.list().await?;
    Ok(Json(ApiResponse::ok(templates)))
}

/// PUT /v1/template/{id}
pub async fn update_template(
    State(state): State<AppState>,
    IdPath(id): IdPath<TemplateId>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<ApiResponse<Template>>, ApiError> {
    validate_request(&req)?;
    let template = state.template_service.update(id, req.into()).await?;
    Ok(Json(ApiResponse::ok(template)))
}

/// DELETE /v1/template/{id}
pub async fn delete_template(
    State(state): State<AppState>,
    IdPath(id): IdPath<TemplateId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.template_service.delete(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "template deleted successfully",
    ))))
}

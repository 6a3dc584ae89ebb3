//! Session handlers: lifecycle, checkout and subresources.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use reslib_core::types::{ResourceId, SessionId};
use reslib_entity::{Resource, Session};
use reslib_lease::SubresourceBalance;

use crate::dto::request::{CreateSessionRequest, validate_request};
use crate::dto::response::{ApiResponse, MessageResponse, SessionClosedResponse, TokenResponse};
use crate::error::ApiError;
use crate::extractors::path::parse_id;
use crate::extractors::{IdPath, SessionAuth};
use crate::state::AppState;

const SESSION_TERMINATED: &str = "session terminated";

/// POST /v1/session
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TokenResponse>>), ApiError> {
    validate_request(&req)?;
    let grant = state.lease.create_session(&req.api_key).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(TokenResponse::new(
            grant.session.id,
            grant.token,
        ))),
    ))
}

/// GET /v1/session
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Session>>>, ApiError> {
    let sessions = state.lease.list_sessions().await?;
    Ok(Json(ApiResponse::ok(sessions)))
}

/// DELETE /v1/session/{id}
pub async fn close_session_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath<SessionId>,
) -> Result<Json<ApiResponse<SessionClosedResponse>>, ApiError> {
    let report = state.lease.close_session(id).await?;
    Ok(Json(ApiResponse::ok(SessionClosedResponse {
        message: SESSION_TERMINATED.to_string(),
        report,
    })))
}

/// PUT /v1/session/authorized
pub async fn renew_session(
    State(state): State<AppState>,
    auth: SessionAuth,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let token = state.lease.renew_session(auth.session_id).await?;
    Ok(Json(ApiResponse::ok(TokenResponse::new(
        auth.session_id,
        token,
    ))))
}

/// DELETE /v1/session/authorized
pub async fn close_session(
    State(state): State<AppState>,
    auth: SessionAuth,
) -> Result<Json<ApiResponse<SessionClosedResponse>>, ApiError> {
    let report = state.lease.close_session(auth.session_id).await?;
    Ok(Json(ApiResponse::ok(SessionClosedResponse {
        message: SESSION_TERMINATED.to_string(),
        report,
    })))
}

/// PUT /v1/session/authorized/checkout/{id}
pub async fn check_out(
    State(state): State<AppState>,
    auth: SessionAuth,
    IdPath(resource_id): IdPath<ResourceId>,
) -> Result<Json<ApiResponse<Resource>>, ApiError> {
    let resource = state.lease.check_out(auth.session_id, resource_id).await?;
    Ok(Json(ApiResponse::ok(resource)))
}

/// PUT /v1/session/authorized/checkin/{id}
pub async fn check_in(
    State(state): State<AppState>,
    auth: SessionAuth,
    IdPath(resource_id): IdPath<ResourceId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.lease.check_in(auth.session_id, resource_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("checked in"))))
}

/// PUT /v1/session/authorized/checkout/{id}/{key}
pub async fn consume(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((id, key)): Path<(String, String)>,
) -> Result<Json<ApiResponse<SubresourceBalance>>, ApiError> {
    let resource_id: ResourceId = parse_id(&id)?;
    let balance = state
        .lease
        .consume(auth.session_id, resource_id, &key)
        .await?;
    Ok(Json(ApiResponse::ok(balance)))
}

/// PUT /v1/session/authorized/checkin/{id}/{key}
pub async fn release(
    State(state): State<AppState>,
    auth: SessionAuth,
    Path((id, key)): Path<(String, String)>,
) -> Result<Json<ApiResponse<SubresourceBalance>>, ApiError> {
    let resource_id: ResourceId = parse_id(&id)?;
    let balance = state
        .lease
        .release(auth.session_id, resource_id, &key)
        .await?;
    Ok(Json(ApiResponse::ok(balance)))
}

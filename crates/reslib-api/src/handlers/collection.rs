//! Read-only collection browser.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::Value;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /v1/collections/{name}
pub async fn list_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Vec<Value>>>, ApiError> {
    let documents = state.collection_browser.list(&name).await?;
    Ok(Json(ApiResponse::ok(documents)))
}

/// GET /v1/collections/{name}/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let document = state.collection_browser.get(&name, &id).await?;
    Ok(Json(ApiResponse::ok(document)))
}

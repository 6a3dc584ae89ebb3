//! `SessionAuth` extractor: pulls the session credential from the
//! Authorization header and verifies it.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};

use reslib_core::error::AppError;
use reslib_core::types::SessionId;
use reslib_lease::jwt::BEARER_PREFIX;

use crate::error::ApiError;
use crate::state::AppState;

/// The session a request acts for.
///
/// Only the credential is checked here; whether the session still exists
/// is decided by the lease manager.
#[derive(Debug, Clone, Copy)]
pub struct SessionAuth {
    /// Session named by the credential.
    pub session_id: SessionId,
    /// Credential expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl FromRequestParts<AppState> for SessionAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        if !header.starts_with(BEARER_PREFIX) {
            return Err(AppError::unauthorized("Invalid Authorization header format").into());
        }

        let claims = state.verifier.verify(header)?;

        Ok(SessionAuth {
            session_id: claims.session_id(),
            expires_at: claims.expires_at(),
        })
    }
}

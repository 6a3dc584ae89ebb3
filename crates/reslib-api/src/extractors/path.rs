//! Typed path parameter helpers.

use std::str::FromStr;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use reslib_core::error::AppError;
use reslib_core::types::id::INVALID_ID_MESSAGE;

use crate::error::ApiError;

/// Parses a document identifier from a path segment.
pub fn parse_id<I: FromStr>(raw: &str) -> Result<I, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation(INVALID_ID_MESSAGE))
}

/// A single identifier path parameter, rejected with 400 when malformed.
#[derive(Debug, Clone, Copy)]
pub struct IdPath<I>(pub I);

impl<S, I> FromRequestParts<S> for IdPath<I>
where
    S: Send + Sync,
    I: FromStr + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        Ok(IdPath(parse_id(&raw)?))
    }
}

//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reslib_core::types::SessionId;
use reslib_lease::{IssuedToken, TeardownReport};
use reslib_service::CascadeReport;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A session credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Session the credential is for.
    pub session_id: SessionId,
    /// `Bearer <jwt>`.
    pub token: String,
    /// Credential expiry.
    pub expires_at: DateTime<Utc>,
}

impl TokenResponse {
    pub fn new(session_id: SessionId, token: IssuedToken) -> Self {
        Self {
            session_id,
            token: token.token,
            expires_at: token.expires_at,
        }
    }
}

/// Result of closing a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClosedResponse {
    /// Message.
    pub message: String,
    /// Compensating actions and the ones that could not be applied.
    pub report: TeardownReport,
}

/// Result of deleting a project or resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    /// Message.
    pub message: String,
    /// Association updates made on the other side.
    pub cascade: CascadeReport,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Version.
    pub version: String,
    /// Seconds since the server state was built.
    pub uptime_seconds: u64,
    /// Document store backend.
    pub store: String,
}

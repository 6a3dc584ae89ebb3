//! Session credential issuing.

use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use reslib_core::error::AppError;
use reslib_core::types::SessionId;

use super::BEARER_PREFIX;
use super::claims::SessionClaims;

/// A freshly issued credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// `Bearer <jwt>`.
    pub token: String,
    /// When the credential stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Signs HS256 session credentials.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Creates an issuer signing with `secret`.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
        }
    }

    /// Issue a credential for `session_id` valid until `expires_at`.
    pub fn issue(
        &self,
        session_id: SessionId,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let claims = SessionClaims {
            sid: session_id,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };

        let jwt = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok(IssuedToken {
            token: format!("{BEARER_PREFIX}{jwt}"),
            expires_at,
        })
    }
}

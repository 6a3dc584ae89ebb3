//! Bearer credentials for lease sessions.

pub mod claims;
pub mod issuer;
pub mod verifier;

pub use claims::SessionClaims;
pub use issuer::{IssuedToken, TokenIssuer};
pub use verifier::TokenVerifier;

/// Scheme prefix of issued credentials.
pub const BEARER_PREFIX: &str = "Bearer ";

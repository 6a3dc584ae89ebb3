//! Custom Axum extractors.

pub mod auth;
pub mod path;

pub use auth::SessionAuth;
pub use path::IdPath;

//! # reslib-api
//!
//! HTTP API layer for reslib built on Axum.
//!
//! Provides the `/v1` REST endpoints, the bearer-session extractor,
//! request logging and CORS middleware, DTOs, error mapping and the
//! server bootstrap that wires stores, scheduler and lease manager.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;

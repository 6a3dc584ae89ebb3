//! Project catalog and API keys.

pub mod service;

pub use service::ProjectService;

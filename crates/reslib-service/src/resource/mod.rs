//! Resource catalog: creation against templates, updates and association
//! reconciliation.

pub mod service;

pub use service::ResourceService;

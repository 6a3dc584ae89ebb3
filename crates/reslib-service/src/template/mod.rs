//! Template catalog.

pub mod service;

pub use service::TemplateService;

//! # reslib-service
//!
//! Catalog services for templates, projects and resources. Each service
//! takes the shared [`Stores`](reslib_database::Stores) and
//! [`CollectionLocks`](reslib_lease::CollectionLocks) at construction and
//! holds the locks of every collection it touches for the whole
//! read-modify-write sequence.
//!
//! Session, checkout and subresource operations live in `reslib-lease`.

pub mod browse;
pub mod cascade;
pub mod project;
pub mod reconcile;
pub mod resource;
pub mod template;
pub mod validation;

pub use browse::CollectionBrowser;
pub use cascade::CascadeReport;
pub use project::ProjectService;
pub use reconcile::AssociationDiff;
pub use resource::ResourceService;
pub use template::TemplateService;

//! # reslib-entity
//!
//! Document models for reslib. Every struct in this crate is either a
//! persisted document (implementing [`reslib_core::traits::Document`]) or a
//! value object embedded in one. All entities derive `Debug`, `Clone`,
//! `Serialize` and `Deserialize`.

pub mod field;
pub mod project;
pub mod resource;
pub mod session;
pub mod setting;
pub mod template;

pub use field::{Field, FieldKind, FieldSchema, FieldValue};
pub use project::{Project, ProjectInput, ProjectSetting};
pub use resource::{Resource, ResourceInput, ResourceUpdate};
pub use session::{Consumption, Session};
pub use setting::GlobalSetting;
pub use template::{Template, TemplateInput};

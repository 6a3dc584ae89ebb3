//! Template domain entities.

pub mod model;

pub use model::{Template, TemplateInput};

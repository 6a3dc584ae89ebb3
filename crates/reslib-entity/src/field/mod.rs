//! Typed resource fields and template field schemas.

pub mod kind;
pub mod model;
pub mod value;

pub use kind::FieldKind;
pub use model::{Field, FieldSchema};
pub use value::FieldValue;

//! Core traits defined in `reslib-core` and implemented by other crates.

pub mod scheduler;
pub mod store;

pub use scheduler::{ExpiryScheduler, ExpiryTask};
pub use store::{Document, DocumentStore};

//! Core type definitions used across the reslib workspace.

pub mod collection;
pub mod filter;
pub mod id;

pub use collection::Collection;
pub use filter::{Filter, FilterField, FilterOp};
pub use id::*;

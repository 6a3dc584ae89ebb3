//! # reslib-core
//!
//! Core crate for reslib. Contains the store and scheduler traits,
//! configuration schemas, typed identifiers, document filters, key
//! generation, and the unified error system.
//!
//! This crate has **no** internal dependencies on other reslib crates.

pub mod config;
pub mod error;
pub mod keys;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

//! Route handlers organized by domain.

pub mod collection;
pub mod health;
pub mod project;
pub mod resource;
pub mod session;
pub mod template;

//! Global settings.

pub mod model;

pub use model::GlobalSetting;

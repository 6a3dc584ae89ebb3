//! Session domain entities.

pub mod ledger;
pub mod model;

pub use ledger::Consumption;
pub use model::Session;

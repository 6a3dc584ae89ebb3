//! # reslib-database
//!
//! Document store backends for reslib: a process-local in-memory store and
//! a PostgreSQL JSONB store, plus connection and migration management and
//! the [`Stores`] bundle handed to the rest of the application.

pub mod connection;
pub mod migration;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use stores::Stores;

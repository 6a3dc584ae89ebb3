//! Session expiry schedulers for reslib.
//!
//! This crate provides:
//! - [`CronExpiryScheduler`], one-shot jobs on a `tokio-cron-scheduler`
//!   `JobScheduler`, used by the server
//! - [`ManualExpiryScheduler`], which only fires when told to, used by tests

pub mod expiry;

pub use expiry::{CronExpiryScheduler, ManualExpiryScheduler};

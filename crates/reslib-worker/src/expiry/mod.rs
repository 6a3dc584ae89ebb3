//! [`reslib_core::traits::ExpiryScheduler`] implementations.

pub mod cron;
pub mod manual;

pub use cron::CronExpiryScheduler;
pub use manual::ManualExpiryScheduler;

//! Delayed-job scheduler trait used for session expiry.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::result::AppResult;
use crate::types::id::JobHandle;

/// A callback run once when an expiry job fires.
///
/// The scheduler passes the handle of the firing job, so the callback can
/// tell whether it is still the job its owner expects.
pub type ExpiryTask = Box<dyn FnOnce(JobHandle) -> BoxFuture<'static, ()> + Send + 'static>;

/// Schedules one-shot callbacks and cancels them by handle.
#[async_trait]
pub trait ExpiryScheduler: Send + Sync + Debug + 'static {
    /// Run `task` once after `delay`, returning a handle that can cancel it.
    async fn schedule_after(&self, delay: Duration, task: ExpiryTask) -> AppResult<JobHandle>;

    /// Cancel a scheduled job.
    ///
    /// Cancelling a handle that already fired, was already cancelled, or was
    /// never issued is not an error.
    async fn cancel(&self, handle: JobHandle) -> AppResult<()>;
}

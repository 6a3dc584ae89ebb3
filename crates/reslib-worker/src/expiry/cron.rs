//! One-shot expiry jobs on a cron job scheduler.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use reslib_core::error::AppError;
use reslib_core::result::AppResult;
use reslib_core::traits::{ExpiryScheduler, ExpiryTask};
use reslib_core::types::JobHandle;

/// Expiry scheduler backed by `tokio-cron-scheduler` one-shot jobs.
///
/// The job's uuid is the returned handle. Live handles are tracked so
/// that cancelling an unknown or already-fired handle is a no-op.
#[derive(Clone)]
pub struct CronExpiryScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Handles that have been scheduled and have neither fired nor been cancelled
    live: Arc<DashMap<JobHandle, DateTime<Utc>>>,
}

impl std::fmt::Debug for CronExpiryScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronExpiryScheduler")
            .field("live", &self.live.len())
            .finish()
    }
}

impl CronExpiryScheduler {
    /// Create a new, not yet started scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            live: Arc::new(DashMap::new()),
        })
    }

    /// Start firing jobs
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Expiry scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler; pending jobs are dropped
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!(pending = self.live.len(), "Expiry scheduler shut down");
        Ok(())
    }

    /// Number of jobs waiting to fire
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// When a live job is due, if it is still live
    pub fn due_at(&self, handle: JobHandle) -> Option<DateTime<Utc>> {
        self.live.get(&handle).map(|due| *due)
    }
}

#[async_trait]
impl ExpiryScheduler for CronExpiryScheduler {
    async fn schedule_after(&self, delay: Duration, task: ExpiryTask) -> AppResult<JobHandle> {
        let live = Arc::clone(&self.live);
        let task = Arc::new(Mutex::new(Some(task)));

        let job = CronJob::new_one_shot_async(delay, move |uuid, _scheduler| {
            let live = Arc::clone(&live);
            let task = Arc::clone(&task);
            Box::pin(async move {
                let handle = JobHandle::from(uuid);
                if live.remove(&handle).is_none() {
                    tracing::debug!(job_id = %handle, "Cancelled expiry job skipped");
                    return;
                }
                let task = task.lock().ok().and_then(|mut slot| slot.take());
                if let Some(task) = task {
                    tracing::debug!(job_id = %handle, "Expiry job firing");
                    task(handle).await;
                }
            })
        })
        .map_err(|e| AppError::scheduler(format!("Failed to create expiry job: {}", e)))?;

        let handle = JobHandle::from(job.guid());
        let due = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|delay| Utc::now().checked_add_signed(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.live.insert(handle, due);

        if let Err(e) = self.scheduler.add(job).await {
            self.live.remove(&handle);
            return Err(AppError::scheduler(format!(
                "Failed to add expiry job: {}",
                e
            )));
        }

        tracing::debug!(job_id = %handle, delay_seconds = delay.as_secs(), "Expiry job scheduled");
        Ok(handle)
    }

    async fn cancel(&self, handle: JobHandle) -> AppResult<()> {
        if self.live.remove(&handle).is_none() {
            return Ok(());
        }

        self.scheduler
            .remove(&handle.0)
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to cancel expiry job: {}", e)))?;

        tracing::debug!(job_id = %handle, "Expiry job cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;

    use super::*;

    fn counting_task(counter: Arc<AtomicUsize>) -> ExpiryTask {
        Box::new(move |_handle| {
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        })
    }

    #[tokio::test]
    async fn test_job_fires_once() {
        let scheduler = CronExpiryScheduler::new().await.unwrap();
        scheduler.start().await.unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler
            .schedule_after(Duration::from_millis(100), counting_task(Arc::clone(&fired)))
            .await
            .unwrap();
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
        scheduler.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_job_does_not_fire() {
        let scheduler = CronExpiryScheduler::new().await.unwrap();
        scheduler.start().await.unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let handle = scheduler
            .schedule_after(Duration::from_secs(1), counting_task(Arc::clone(&fired)))
            .await
            .unwrap();
        scheduler.cancel(handle).await.unwrap();
        // Idempotent, including for handles never issued.
        scheduler.cancel(handle).await.unwrap();
        scheduler.cancel(JobHandle::new()).await.unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        scheduler.shutdown().await.unwrap();
    }
}

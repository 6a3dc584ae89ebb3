//! An expiry scheduler driven by hand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use reslib_core::result::AppResult;
use reslib_core::traits::{ExpiryScheduler, ExpiryTask};
use reslib_core::types::JobHandle;

struct ManualJob {
    delay: Duration,
    seq: usize,
    cancelled: bool,
    task: Option<ExpiryTask>,
}

/// Scheduler whose jobs only run when [`fire`](Self::fire) is called.
///
/// Cancelled jobs keep their task so [`fire_late`](Self::fire_late) can
/// replay a firing that raced its cancellation.
#[derive(Default)]
pub struct ManualExpiryScheduler {
    jobs: Mutex<HashMap<JobHandle, ManualJob>>,
    scheduled: AtomicUsize,
}

impl std::fmt::Debug for ManualExpiryScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualExpiryScheduler")
            .field("scheduled", &self.scheduled.load(Ordering::SeqCst))
            .finish()
    }
}

impl ManualExpiryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of jobs ever scheduled.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled.load(Ordering::SeqCst)
    }

    /// Jobs that are neither fired nor cancelled, oldest first.
    pub async fn pending(&self) -> Vec<JobHandle> {
        let jobs = self.jobs.lock().await;
        let mut pending: Vec<_> = jobs
            .iter()
            .filter(|(_, job)| !job.cancelled && job.task.is_some())
            .map(|(handle, job)| (job.seq, *handle))
            .collect();
        pending.sort();
        pending.into_iter().map(|(_, handle)| handle).collect()
    }

    /// Cancelled jobs, oldest first.
    pub async fn cancelled(&self) -> Vec<JobHandle> {
        let jobs = self.jobs.lock().await;
        let mut cancelled: Vec<_> = jobs
            .iter()
            .filter(|(_, job)| job.cancelled)
            .map(|(handle, job)| (job.seq, *handle))
            .collect();
        cancelled.sort();
        cancelled.into_iter().map(|(_, handle)| handle).collect()
    }

    /// The delay a job was scheduled with.
    pub async fn delay_of(&self, handle: JobHandle) -> Option<Duration> {
        self.jobs.lock().await.get(&handle).map(|job| job.delay)
    }

    /// Run a pending job. Returns false if it was cancelled, already fired
    /// or unknown.
    pub async fn fire(&self, handle: JobHandle) -> bool {
        self.run(handle, false).await
    }

    /// Run a job even if it was cancelled, as long as it never ran.
    pub async fn fire_late(&self, handle: JobHandle) -> bool {
        self.run(handle, true).await
    }

    /// Fire every pending job in scheduling order.
    pub async fn fire_all(&self) -> usize {
        let mut fired = 0;
        for handle in self.pending().await {
            if self.fire(handle).await {
                fired += 1;
            }
        }
        fired
    }

    async fn run(&self, handle: JobHandle, ignore_cancel: bool) -> bool {
        // The lock is released before the task runs; tasks cancel jobs too.
        let task = {
            let mut jobs = self.jobs.lock().await;
            match jobs.get_mut(&handle) {
                Some(job) if ignore_cancel || !job.cancelled => job.task.take(),
                _ => None,
            }
        };

        match task {
            Some(task) => {
                task(handle).await;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ExpiryScheduler for ManualExpiryScheduler {
    async fn schedule_after(&self, delay: Duration, task: ExpiryTask) -> AppResult<JobHandle> {
        let handle = JobHandle::new();
        let seq = self.scheduled.fetch_add(1, Ordering::SeqCst);
        self.jobs.lock().await.insert(
            handle,
            ManualJob {
                delay,
                seq,
                cancelled: false,
                task: Some(task),
            },
        );
        Ok(handle)
    }

    async fn cancel(&self, handle: JobHandle) -> AppResult<()> {
        if let Some(job) = self.jobs.lock().await.get_mut(&handle) {
            if job.task.is_some() {
                job.cancelled = true;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::FutureExt;
    use tokio::sync::Mutex as AsyncMutex;

    use super::*;

    fn recording_task(seen: Arc<AsyncMutex<Vec<JobHandle>>>) -> ExpiryTask {
        Box::new(move |handle| {
            async move {
                seen.lock().await.push(handle);
            }
            .boxed()
        })
    }

    #[tokio::test]
    async fn test_fire_passes_own_handle_once() {
        let scheduler = ManualExpiryScheduler::new();
        let seen = Arc::new(AsyncMutex::new(Vec::new()));

        let handle = scheduler
            .schedule_after(Duration::from_secs(60), recording_task(Arc::clone(&seen)))
            .await
            .unwrap();
        assert_eq!(scheduler.delay_of(handle).await, Some(Duration::from_secs(60)));
        assert_eq!(scheduler.pending().await, vec![handle]);

        assert!(scheduler.fire(handle).await);
        assert!(!scheduler.fire(handle).await);
        assert_eq!(*seen.lock().await, vec![handle]);
        assert!(scheduler.pending().await.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_blocks_fire_but_not_fire_late() {
        let scheduler = ManualExpiryScheduler::new();
        let seen = Arc::new(AsyncMutex::new(Vec::new()));

        let handle = scheduler
            .schedule_after(Duration::from_secs(1), recording_task(Arc::clone(&seen)))
            .await
            .unwrap();
        scheduler.cancel(handle).await.unwrap();
        scheduler.cancel(handle).await.unwrap();
        scheduler.cancel(JobHandle::new()).await.unwrap();

        assert_eq!(scheduler.cancelled().await, vec![handle]);
        assert!(!scheduler.fire(handle).await);
        assert!(seen.lock().await.is_empty());

        assert!(scheduler.fire_late(handle).await);
        assert_eq!(*seen.lock().await, vec![handle]);
    }

    #[tokio::test]
    async fn test_fire_all_in_order() {
        let scheduler = ManualExpiryScheduler::new();
        let seen = Arc::new(AsyncMutex::new(Vec::new()));

        let mut handles = Vec::new();
        for _ in 0..3 {
            handles.push(
                scheduler
                    .schedule_after(Duration::from_secs(1), recording_task(Arc::clone(&seen)))
                    .await
                    .unwrap(),
            );
        }

        assert_eq!(scheduler.fire_all().await, 3);
        assert_eq!(*seen.lock().await, handles);
        assert_eq!(scheduler.scheduled_count(), 3);
    }
}

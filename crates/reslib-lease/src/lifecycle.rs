//! Session lifecycle: creation, renewal, termination and recovery.
//!
//! Every session has exactly one live expiry job, whose handle is stored
//! on the session document. A job only terminates the session if that
//! stored handle is still its own, so a job made stale by a renewal or a
//! close does nothing when it fires.

use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use reslib_core::config::session::RecoveryPolicy;
use reslib_core::error::AppError;
use reslib_core::result::AppResult;
use reslib_core::traits::ExpiryTask;
use reslib_core::types::{Collection, Filter, JobHandle, SessionId};
use reslib_entity::Session;

use crate::jwt::IssuedToken;
use crate::manager::{LeaseManager, SESSION_NOT_FOUND};
use crate::teardown::{CompensationFailure, TeardownReport};

const PROJECT_NOT_FOUND: &str = "project not found";

/// A newly opened session and its credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionGrant {
    /// The session document.
    pub session: Session,
    /// The bearer credential.
    pub token: IssuedToken,
}

/// Result of tearing a session down.
#[derive(Debug, Clone)]
pub struct Termination {
    /// The expiry job the session was carrying.
    pub job_id: JobHandle,
    /// Compensating actions performed and skipped.
    pub report: TeardownReport,
}

impl LeaseManager {
    /// Open a session against the project owning `api_key`.
    pub async fn create_session(&self, api_key: &str) -> AppResult<SessionGrant> {
        if api_key.trim().is_empty() {
            return Err(AppError::validation("apikey cannot be blank"));
        }

        let _guard = self
            .locks()
            .acquire(&[Collection::Projects, Collection::Sessions])
            .await;

        let project = self
            .stores()
            .projects
            .find_first(&Filter::eq("api_key", api_key))
            .await?
            .ok_or_else(|| AppError::not_found(PROJECT_NOT_FOUND))?;

        let session_id = SessionId::new();
        let ttl = self.ttl();
        let expires_at = Utc::now() + ttl;
        let token = self.inner.issuer.issue(session_id, expires_at)?;

        let job_id = self.schedule_expiry(session_id, ttl).await?;
        let session = Session::new(session_id, project.id, job_id, expires_at);
        if let Err(e) = self.stores().sessions.insert(&session).await {
            self.cancel_job(job_id).await;
            return Err(e);
        }

        info!(
            session_id = %session_id,
            project_id = %project.id,
            job_id = %job_id,
            expires_at = %expires_at,
            "Session created"
        );
        Ok(SessionGrant { session, token })
    }

    /// Restart a session's lease window and issue a fresh credential.
    ///
    /// The replacement job is persisted before the previous one is
    /// cancelled; if persisting fails the previous job stays live.
    pub async fn renew_session(&self, session_id: SessionId) -> AppResult<IssuedToken> {
        let _guard = self.locks().acquire(&[Collection::Sessions]).await;

        let mut session = self.load_session(session_id).await?;
        let previous_job = session.job_id;
        let ttl = self.ttl();

        let job_id = self.schedule_expiry(session_id, ttl).await?;
        session.extend(job_id, ttl);

        let persisted = match self.stores().sessions.update(&session).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::not_found(SESSION_NOT_FOUND)),
            Err(e) => Err(e),
        };
        if let Err(e) = persisted {
            self.cancel_job(job_id).await;
            return Err(e);
        }
        self.cancel_job(previous_job).await;

        let token = self.inner.issuer.issue(session_id, session.expires_at)?;
        info!(
            session_id = %session_id,
            job_id = %job_id,
            previous_job = %previous_job,
            expires_at = %session.expires_at,
            "Session renewed"
        );
        Ok(token)
    }

    /// Tear a session down, returning everything it held.
    ///
    /// Best effort: resources or fields that cannot be found are recorded
    /// in the report and skipped. The session's expiry job is not
    /// cancelled; see [`LeaseManager::close_session`].
    pub async fn terminate(&self, session_id: SessionId) -> AppResult<Termination> {
        self.terminate_matching(session_id, None)
            .await?
            .ok_or_else(|| AppError::not_found(SESSION_NOT_FOUND))
    }

    /// Terminate a session and cancel its expiry job.
    pub async fn close_session(&self, session_id: SessionId) -> AppResult<TeardownReport> {
        let termination = self.terminate(session_id).await?;
        self.cancel_job(termination.job_id).await;
        info!(session_id = %session_id, "Session closed");
        Ok(termination.report)
    }

    /// Re-establish expiry jobs for every persisted session.
    ///
    /// Returns the number of sessions recovered.
    pub async fn recover_all(&self) -> AppResult<usize> {
        let _guard = self.locks().acquire(&[Collection::Sessions]).await;

        let policy = self.config().recovery_policy;
        let ttl = self.ttl();
        let now = Utc::now();
        let sessions = self.stores().sessions.find_all(&Filter::all()).await?;
        let count = sessions.len();

        for mut session in sessions {
            let delay = match policy {
                RecoveryPolicy::FreshWindow => ttl,
                RecoveryPolicy::PreserveExpiry => session.remaining(now),
            };
            let job_id = self.schedule_expiry(session.id, delay).await?;
            match policy {
                RecoveryPolicy::FreshWindow => session.extend(job_id, ttl),
                RecoveryPolicy::PreserveExpiry => session.reassign_job(job_id),
            }

            if let Err(e) = self.stores().sessions.update(&session).await {
                self.cancel_job(job_id).await;
                return Err(e);
            }
            debug!(
                session_id = %session.id,
                job_id = %job_id,
                expires_at = %session.expires_at,
                "Session expiry recovered"
            );
        }

        info!(count, policy = ?policy, "Recovered session expiry jobs");
        Ok(count)
    }

    /// List every session in creation order.
    pub async fn list_sessions(&self) -> AppResult<Vec<Session>> {
        let _guard = self.locks().acquire(&[Collection::Sessions]).await;
        let sessions = self.stores().sessions.find_all(&Filter::all()).await?;
        if sessions.is_empty() {
            return Err(AppError::not_found(SESSION_NOT_FOUND));
        }
        Ok(sessions)
    }

    /// Fetch one session.
    pub async fn find_session(&self, session_id: SessionId) -> AppResult<Session> {
        self.load_session(session_id).await
    }

    /// Handle a fired expiry job.
    pub(crate) async fn expire(&self, session_id: SessionId, job_id: JobHandle) {
        match self.terminate_matching(session_id, Some(job_id)).await {
            Ok(Some(_)) => info!(session_id = %session_id, job_id = %job_id, "Session expired"),
            Ok(None) => debug!(
                session_id = %session_id,
                job_id = %job_id,
                "Stale expiry job ignored"
            ),
            Err(e) if e.is_not_found() => debug!(
                session_id = %session_id,
                job_id = %job_id,
                "Expiry job fired for a closed session"
            ),
            Err(e) => error!(
                session_id = %session_id,
                job_id = %job_id,
                error = %e,
                "Session expiry failed"
            ),
        }
    }

    /// Terminate `session_id`; when `expected_job` is set, only if the
    /// session still carries that job. Returns `None` on a job mismatch.
    async fn terminate_matching(
        &self,
        session_id: SessionId,
        expected_job: Option<JobHandle>,
    ) -> AppResult<Option<Termination>> {
        let _guard = self
            .locks()
            .acquire(&[Collection::Resources, Collection::Sessions])
            .await;

        let session = self.load_session(session_id).await?;
        if expected_job.is_some_and(|job| job != session.job_id) {
            return Ok(None);
        }

        let mut report = TeardownReport::new(session_id);
        let mut ledger = session.consumed.clone();

        for &resource_id in &session.resources {
            let (entries, rest): (Vec<_>, Vec<_>) =
                ledger.into_iter().partition(|c| c.parent_id == resource_id);
            ledger = rest;

            let mut resource = match self.stores().resources.find_by_id(resource_id).await {
                Ok(Some(resource)) => resource,
                Ok(None) => {
                    report.record(CompensationFailure::MissingResource { resource_id });
                    continue;
                }
                Err(e) => {
                    report.record(CompensationFailure::ResourceWriteFailed {
                        resource_id,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            resource.unlease();
            let mut units = 0u64;
            for entry in entries {
                match resource.adjust_quantity(&entry.key, i64::from(entry.amount)) {
                    Some(_) => units += u64::from(entry.amount),
                    None => report.record(CompensationFailure::MissingField {
                        resource_id,
                        key: entry.key,
                        amount: entry.amount,
                    }),
                }
            }

            match self.stores().resources.update(&resource).await {
                Ok(true) => {
                    report.released_resources += 1;
                    report.released_units += units;
                }
                Ok(false) => {
                    report.record(CompensationFailure::MissingResource { resource_id });
                }
                Err(e) => report.record(CompensationFailure::ResourceWriteFailed {
                    resource_id,
                    message: e.to_string(),
                }),
            }
        }

        for entry in ledger {
            report.record(CompensationFailure::OrphanLedgerEntry {
                resource_id: entry.parent_id,
                key: entry.key,
                amount: entry.amount,
            });
        }

        self.stores().sessions.delete(session_id).await?;

        if !report.is_clean() {
            warn!(
                session_id = %session_id,
                failures = ?report.failures,
                "Session teardown could not apply every compensating action"
            );
        }
        info!(
            session_id = %session_id,
            released_resources = report.released_resources,
            released_units = report.released_units,
            "Session terminated"
        );
        Ok(Some(Termination {
            job_id: session.job_id,
            report,
        }))
    }

    /// Schedule the expiry job for `session_id` after `delay`.
    async fn schedule_expiry(&self, session_id: SessionId, delay: Duration) -> AppResult<JobHandle> {
        let manager = Arc::downgrade(&self.inner);
        let task: ExpiryTask = Box::new(move |job_id| {
            async move {
                if let Some(inner) = manager.upgrade() {
                    LeaseManager { inner }.expire(session_id, job_id).await;
                }
            }
            .boxed()
        });

        let delay = delay.to_std().unwrap_or(std::time::Duration::ZERO);
        self.scheduler().schedule_after(delay, task).await
    }

    async fn cancel_job(&self, job_id: JobHandle) {
        if let Err(e) = self.scheduler().cancel(job_id).await {
            warn!(job_id = %job_id, error = %e, "Failed to cancel expiry job");
        }
    }
}

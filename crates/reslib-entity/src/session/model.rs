//! Session document model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use reslib_core::traits::Document;
use reslib_core::types::{Collection, JobHandle, ProjectId, ResourceId, SessionId};

use super::ledger::Consumption;

/// A time-bounded lease session opened against a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: SessionId,
    /// Handle of the expiry job currently scheduled for this session.
    #[serde(alias = "jobid")]
    pub job_id: JobHandle,
    /// The project this session was opened against.
    pub project: ProjectId,
    /// Resources currently checked out by this session.
    #[serde(default)]
    pub resources: Vec<ResourceId>,
    /// Subresource consumption ledger.
    #[serde(default)]
    pub consumed: Vec<Consumption>,
    /// When the session was opened.
    pub issued_at: DateTime<Utc>,
    /// When the current lease window ends.
    pub expires_at: DateTime<Utc>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Build a new session with its first expiry job.
    pub fn new(
        id: SessionId,
        project: ProjectId,
        job_id: JobHandle,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            job_id,
            project,
            resources: Vec::new(),
            consumed: Vec::new(),
            issued_at: now,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the session has the resource checked out.
    pub fn holds(&self, resource: ResourceId) -> bool {
        self.resources.contains(&resource)
    }

    /// Add a resource to the checked-out set.
    pub fn check_out(&mut self, resource: ResourceId) {
        if !self.holds(resource) {
            self.resources.push(resource);
            self.touch();
        }
    }

    /// Remove a resource from the checked-out set. Returns whether it was held.
    pub fn check_in(&mut self, resource: ResourceId) -> bool {
        let before = self.resources.len();
        self.resources.retain(|r| *r != resource);
        let removed = self.resources.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// The ledger entry for a (resource, key) pair.
    pub fn consumption(&self, resource: ResourceId, key: &str) -> Option<&Consumption> {
        self.consumed.iter().find(|c| c.is_for(resource, key))
    }

    /// Record one unit drawn; returns the new amount.
    ///
    /// Returns `None`, leaving the session unchanged, if the entry is
    /// already at its maximum.
    pub fn record_consume(&mut self, resource: ResourceId, key: &str) -> Option<u32> {
        let held = match self.consumed.iter_mut().find(|c| c.is_for(resource, key)) {
            Some(entry) => {
                entry.amount = entry.amount.checked_add(1)?;
                entry.amount
            }
            None => {
                self.consumed.push(Consumption {
                    parent_id: resource,
                    key: key.to_string(),
                    amount: 1,
                });
                1
            }
        };
        self.touch();
        Some(held)
    }

    /// Record one unit returned.
    ///
    /// Returns the remaining amount (the entry is removed at zero), or
    /// `None` if the session holds no such entry.
    pub fn record_release(&mut self, resource: ResourceId, key: &str) -> Option<u32> {
        let index = self.consumed.iter().position(|c| c.is_for(resource, key))?;
        let entry = &mut self.consumed[index];
        entry.amount = entry.amount.saturating_sub(1);
        let remaining = entry.amount;
        if remaining == 0 {
            self.consumed.remove(index);
        }
        self.touch();
        Some(remaining)
    }

    /// Ledger entries whose parent is `resource`.
    pub fn consumed_from(&self, resource: ResourceId) -> impl Iterator<Item = &Consumption> {
        self.consumed.iter().filter(move |c| c.parent_id == resource)
    }

    /// Remove and return every ledger entry whose parent is `resource`.
    pub fn drain_consumed_from(&mut self, resource: ResourceId) -> Vec<Consumption> {
        let (drained, kept) = std::mem::take(&mut self.consumed)
            .into_iter()
            .partition(|c| c.parent_id == resource);
        self.consumed = kept;
        self.touch();
        drained
    }

    /// Start a new lease window ending `ttl` from now under a new job.
    pub fn extend(&mut self, job_id: JobHandle, ttl: Duration) {
        self.job_id = job_id;
        self.expires_at = Utc::now() + ttl;
        self.touch();
    }

    /// Move the current window under a new job without changing its end.
    pub fn reassign_job(&mut self, job_id: JobHandle) {
        self.job_id = job_id;
        self.touch();
    }

    /// Time left in the current window, zero once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for Session {
    const COLLECTION: Collection = Collection::Sessions;
    type Id = SessionId;

    fn id(&self) -> SessionId {
        self.id
    }
}

//! Reports of compensating actions that could not be applied.

use std::fmt;

use serde::{Deserialize, Serialize};

use reslib_core::types::{ProjectId, ResourceId, SessionId};

/// A compensating action that was skipped or failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompensationFailure {
    /// A referenced resource no longer exists.
    MissingResource {
        /// The vanished resource.
        resource_id: ResourceId,
    },
    /// A referenced project no longer exists.
    MissingProject {
        /// The vanished project.
        project_id: ProjectId,
    },
    /// A ledger entry's subresource field no longer exists.
    MissingField {
        /// Parent resource.
        resource_id: ResourceId,
        /// Subresource key.
        key: String,
        /// Units that could not be returned.
        amount: u32,
    },
    /// Reading or writing a resource failed.
    ResourceWriteFailed {
        /// The resource.
        resource_id: ResourceId,
        /// Store error message.
        message: String,
    },
    /// A ledger entry whose parent resource is not held by the session.
    OrphanLedgerEntry {
        /// Parent resource.
        resource_id: ResourceId,
        /// Subresource key.
        key: String,
        /// Units recorded.
        amount: u32,
    },
}

impl fmt::Display for CompensationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingResource { resource_id } => {
                write!(f, "resource {resource_id} no longer exists")
            }
            Self::MissingProject { project_id } => {
                write!(f, "project {project_id} no longer exists")
            }
            Self::MissingField {
                resource_id,
                key,
                amount,
            } => write!(
                f,
                "field '{key}' missing on resource {resource_id}; {amount} units not returned"
            ),
            Self::ResourceWriteFailed {
                resource_id,
                message,
            } => write!(f, "failed to update resource {resource_id}: {message}"),
            Self::OrphanLedgerEntry {
                resource_id,
                key,
                amount,
            } => write!(
                f,
                "{amount} units of '{key}' recorded against unheld resource {resource_id}"
            ),
        }
    }
}

/// Outcome of tearing down a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeardownReport {
    /// The terminated session.
    pub session_id: SessionId,
    /// Resources whose lease counter was decremented.
    pub released_resources: usize,
    /// Subresource units returned to their fields.
    pub released_units: u64,
    /// Actions that could not be applied.
    pub failures: Vec<CompensationFailure>,
}

impl TeardownReport {
    /// An empty report for `session_id`.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            released_resources: 0,
            released_units: 0,
            failures: Vec::new(),
        }
    }

    /// Whether every compensating action was applied.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Record a failure.
    pub fn record(&mut self, failure: CompensationFailure) {
        self.failures.push(failure);
    }
}

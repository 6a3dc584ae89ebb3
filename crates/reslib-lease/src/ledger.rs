//! Subresource consumption ledger.
//!
//! Ledger entries are always matched on the (resource, key) pair.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use reslib_core::error::AppError;
use reslib_core::result::AppResult;
use reslib_core::types::{Collection, ResourceId, SessionId};

use crate::manager::LeaseManager;

const NOT_CHECKED_OUT: &str = "resource not checked out by the session";
const SUBRESOURCE_NOT_FOUND: &str = "requested subresource could not be found under provided resource";
const SUBRESOURCE_DEPLETED: &str = "subresource already depleted";
const NOT_CONSUMED: &str = "session hasn't consumed this subresource";
const LEDGER_FULL: &str = "session holds the maximum amount of this subresource";

/// Quantities after a consume or release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubresourceBalance {
    /// Parent resource.
    pub resource_id: ResourceId,
    /// Subresource key.
    pub key: String,
    /// Units left on the resource field.
    pub remaining: i64,
    /// Units the session now holds.
    pub held: u32,
}

impl LeaseManager {
    /// Draw one unit of a subresource into the session's ledger.
    pub async fn consume(
        &self,
        session_id: SessionId,
        resource_id: ResourceId,
        key: &str,
    ) -> AppResult<SubresourceBalance> {
        let _guard = self
            .locks()
            .acquire(&[Collection::Resources, Collection::Sessions])
            .await;

        let mut session = self.load_session(session_id).await?;
        if !session.holds(resource_id) {
            return Err(AppError::unauthorized(NOT_CHECKED_OUT));
        }

        let previous = self.load_resource(resource_id).await?;
        let mut resource = previous.clone();
        let field = resource
            .subresource_mut(key)
            .ok_or_else(|| AppError::not_found(SUBRESOURCE_NOT_FOUND))?;
        let available = field.quantity().ok_or_else(|| {
            error!(resource_id = %resource_id, key = %key, "Subresource value is not an integer");
            AppError::internal("internal error")
        })?;
        if available < 1 {
            return Err(AppError::conflict(SUBRESOURCE_DEPLETED));
        }

        let held = session
            .record_consume(resource_id, key)
            .ok_or_else(|| AppError::conflict(LEDGER_FULL))?;
        let remaining = resource
            .adjust_quantity(key, -1)
            .ok_or_else(|| AppError::internal("internal error"))?;

        self.write_pair(&previous, &resource, &session).await?;

        info!(
            session_id = %session_id,
            resource_id = %resource_id,
            key = %key,
            remaining,
            held,
            "Subresource consumed"
        );
        Ok(SubresourceBalance {
            resource_id,
            key: key.to_string(),
            remaining,
            held,
        })
    }

    /// Return one unit of a subresource from the session's ledger.
    pub async fn release(
        &self,
        session_id: SessionId,
        resource_id: ResourceId,
        key: &str,
    ) -> AppResult<SubresourceBalance> {
        let _guard = self
            .locks()
            .acquire(&[Collection::Resources, Collection::Sessions])
            .await;

        let mut session = self.load_session(session_id).await?;
        if session.consumption(resource_id, key).is_none() {
            return Err(AppError::unauthorized(NOT_CONSUMED));
        }

        let previous = self.load_resource(resource_id).await?;
        let mut resource = previous.clone();
        let remaining = resource.adjust_quantity(key, 1).ok_or_else(|| {
            error!(
                session_id = %session_id,
                resource_id = %resource_id,
                key = %key,
                "Ledger entry references a missing subresource"
            );
            AppError::internal("internal error")
        })?;
        let held = session
            .record_release(resource_id, key)
            .ok_or_else(|| AppError::unauthorized(NOT_CONSUMED))?;

        self.write_pair(&previous, &resource, &session).await?;

        info!(
            session_id = %session_id,
            resource_id = %resource_id,
            key = %key,
            remaining,
            held,
            "Subresource released"
        );
        Ok(SubresourceBalance {
            resource_id,
            key: key.to_string(),
            remaining,
            held,
        })
    }
}

//! The lease manager context.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use tracing::error;

use reslib_core::config::session::SessionConfig;
use reslib_core::error::AppError;
use reslib_core::result::AppResult;
use reslib_core::traits::ExpiryScheduler;
use reslib_core::types::{ResourceId, SessionId};
use reslib_database::Stores;
use reslib_entity::{Resource, Session};

use crate::jwt::TokenIssuer;
use crate::locks::CollectionLocks;

pub(crate) const SESSION_NOT_FOUND: &str = "session not found";
pub(crate) const RESOURCE_NOT_FOUND: &str = "resource not found";

/// Owns all mutation of resource lease state and session lifecycles.
///
/// Cheap to clone; clones share the same stores, locks and scheduler.
#[derive(Clone)]
pub struct LeaseManager {
    pub(crate) inner: Arc<LeaseInner>,
}

pub(crate) struct LeaseInner {
    pub(crate) stores: Stores,
    pub(crate) locks: Arc<CollectionLocks>,
    pub(crate) scheduler: Arc<dyn ExpiryScheduler>,
    pub(crate) issuer: TokenIssuer,
    pub(crate) config: SessionConfig,
}

impl fmt::Debug for LeaseManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeaseManager")
            .field("config", &self.inner.config)
            .field("scheduler", &self.inner.scheduler)
            .finish_non_exhaustive()
    }
}

impl LeaseManager {
    /// Creates a lease manager over the given collaborators.
    pub fn new(
        stores: Stores,
        locks: Arc<CollectionLocks>,
        scheduler: Arc<dyn ExpiryScheduler>,
        issuer: TokenIssuer,
        config: SessionConfig,
    ) -> Self {
        Self {
            inner: Arc::new(LeaseInner {
                stores,
                locks,
                scheduler,
                issuer,
                config,
            }),
        }
    }

    /// The document stores.
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// The shared collection lock set.
    pub fn locks(&self) -> &Arc<CollectionLocks> {
        &self.inner.locks
    }

    /// The expiry scheduler.
    pub fn scheduler(&self) -> &Arc<dyn ExpiryScheduler> {
        &self.inner.scheduler
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Length of one lease window.
    pub fn ttl(&self) -> Duration {
        Duration::hours(self.inner.config.ttl_hours as i64)
    }

    pub(crate) async fn load_session(&self, id: SessionId) -> AppResult<Session> {
        self.inner
            .stores
            .sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(SESSION_NOT_FOUND))
    }

    pub(crate) async fn load_resource(&self, id: ResourceId) -> AppResult<Resource> {
        self.inner
            .stores
            .resources
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(RESOURCE_NOT_FOUND))
    }

    /// Persist a resource and then its session.
    ///
    /// If the session write fails the resource is restored to `previous`
    /// before the error is returned.
    pub(crate) async fn write_pair(
        &self,
        previous: &Resource,
        resource: &Resource,
        session: &Session,
    ) -> AppResult<()> {
        let stores = &self.inner.stores;
        if !stores.resources.update(resource).await? {
            return Err(AppError::not_found(RESOURCE_NOT_FOUND));
        }

        let session_write = match stores.sessions.update(session).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::not_found(SESSION_NOT_FOUND)),
            Err(e) => Err(e),
        };

        if let Err(e) = session_write {
            if let Err(restore) = stores.resources.update(previous).await {
                error!(
                    resource_id = %previous.id,
                    session_id = %session.id,
                    error = %restore,
                    "Failed to restore resource after session write failure"
                );
            }
            return Err(e);
        }
        Ok(())
    }
}

//! Whole-resource checkout and check-in.

use tracing::{error, info};

use reslib_core::error::AppError;
use reslib_core::result::AppResult;
use reslib_core::types::{Collection, ResourceId, SessionId};
use reslib_entity::Resource;

use crate::manager::LeaseManager;

const ALREADY_CHECKED_OUT: &str = "resource already checked out";
const NOT_CHECKED_OUT: &str = "resource not checked out by the session";

impl LeaseManager {
    /// Check a resource out to a session.
    ///
    /// Increments the resource's lease counter and adds it to the session's
    /// checked-out set. The counter is advisory: many sessions may hold the
    /// same resource at once.
    pub async fn check_out(
        &self,
        session_id: SessionId,
        resource_id: ResourceId,
    ) -> AppResult<Resource> {
        let _guard = self
            .locks()
            .acquire(&[Collection::Resources, Collection::Sessions])
            .await;

        let mut session = self.load_session(session_id).await?;
        if session.holds(resource_id) {
            return Err(AppError::conflict(ALREADY_CHECKED_OUT));
        }

        let previous = self.load_resource(resource_id).await?;
        let mut resource = previous.clone();
        resource.lease();
        session.check_out(resource_id);

        self.write_pair(&previous, &resource, &session).await?;

        info!(
            session_id = %session_id,
            resource_id = %resource_id,
            checked_out = resource.checked_out,
            "Resource checked out"
        );
        Ok(resource)
    }

    /// Check a resource back in.
    ///
    /// Returns every subresource unit the session drew from it, decrements
    /// the lease counter and removes it from the session's checked-out set.
    pub async fn check_in(&self, session_id: SessionId, resource_id: ResourceId) -> AppResult<()> {
        let _guard = self
            .locks()
            .acquire(&[Collection::Resources, Collection::Sessions])
            .await;

        let mut session = self.load_session(session_id).await?;
        if !session.holds(resource_id) {
            return Err(AppError::validation(NOT_CHECKED_OUT));
        }

        let previous = self.load_resource(resource_id).await?;
        let mut resource = previous.clone();

        // Every entry must map onto a field before anything is written.
        for entry in session.consumed_from(resource_id) {
            if resource.field(&entry.key).and_then(|f| f.quantity()).is_none() {
                error!(
                    session_id = %session_id,
                    resource_id = %resource_id,
                    key = %entry.key,
                    "Ledger entry references a missing subresource"
                );
                return Err(AppError::internal("internal error"));
            }
        }

        let mut released = 0u64;
        for entry in session.drain_consumed_from(resource_id) {
            if resource
                .adjust_quantity(&entry.key, i64::from(entry.amount))
                .is_none()
            {
                return Err(AppError::internal("internal error"));
            }
            released += u64::from(entry.amount);
        }
        resource.unlease();
        session.check_in(resource_id);

        self.write_pair(&previous, &resource, &session).await?;

        info!(
            session_id = %session_id,
            resource_id = %resource_id,
            released_units = released,
            checked_out = resource.checked_out,
            "Resource checked in"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reslib_core::error::ErrorKind;
    use reslib_core::traits::DocumentStore;

    use crate::test_support::Fixture;

    #[tokio::test]
    async fn test_checkout_and_checkin() {
        let fx = Fixture::new().await;
        let resource = fx.resource("printer", 3).await;
        let session = fx.open_session().await;

        let leased = fx.manager.check_out(session, resource).await.unwrap();
        assert_eq!(leased.checked_out, 1);
        assert!(fx.session(session).await.holds(resource));

        fx.manager.check_in(session, resource).await.unwrap();
        assert_eq!(fx.resource_doc(resource).await.checked_out, 0);
        assert!(!fx.session(session).await.holds(resource));
    }

    #[tokio::test]
    async fn test_double_checkout_conflicts() {
        let fx = Fixture::new().await;
        let resource = fx.resource("printer", 3).await;
        let session = fx.open_session().await;

        fx.manager.check_out(session, resource).await.unwrap();
        let err = fx.manager.check_out(session, resource).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(fx.resource_doc(resource).await.checked_out, 1);
    }

    #[tokio::test]
    async fn test_checkin_without_checkout_is_invalid() {
        let fx = Fixture::new().await;
        let resource = fx.resource("printer", 3).await;
        let session = fx.open_session().await;

        let err = fx.manager.check_in(session, resource).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_missing_entities_are_not_found() {
        let fx = Fixture::new().await;
        let resource = fx.resource("printer", 3).await;
        let session = fx.open_session().await;

        let err = fx
            .manager
            .check_out(reslib_core::types::SessionId::new(), resource)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = fx
            .manager
            .check_out(session, reslib_core::types::ResourceId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(fx.session(session).await.resources.is_empty());
    }

    #[tokio::test]
    async fn test_checkin_returns_consumed_units() {
        let fx = Fixture::new().await;
        let resource = fx.resource("printer", 3).await;
        let session = fx.open_session().await;

        fx.manager.check_out(session, resource).await.unwrap();
        fx.manager.consume(session, resource, "tickets").await.unwrap();
        fx.manager.consume(session, resource, "tickets").await.unwrap();
        assert_eq!(fx.quantity(resource, "tickets").await, 1);

        fx.manager.check_in(session, resource).await.unwrap();
        assert_eq!(fx.quantity(resource, "tickets").await, 3);
        assert!(fx.session(session).await.consumed.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_holders_keep_counter_exact() {
        let fx = Fixture::new().await;
        let resource = fx.resource("printer", 3).await;
        let mut sessions = Vec::new();
        for _ in 0..8 {
            sessions.push(fx.open_session().await);
        }

        let manager = Arc::new(fx.manager.clone());
        let tasks: Vec<_> = sessions
            .iter()
            .map(|&s| {
                let manager = Arc::clone(&manager);
                tokio::spawn(async move {
                    manager.check_out(s, resource).await.unwrap();
                    tokio::task::yield_now().await;
                    manager.check_in(s, resource).await.unwrap();
                    manager.check_out(s, resource).await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(fx.resource_doc(resource).await.checked_out, 8);

        for &s in sessions.iter().take(5) {
            fx.manager.check_in(s, resource).await.unwrap();
        }
        assert_eq!(fx.resource_doc(resource).await.checked_out, 3);
    }

    #[tokio::test]
    async fn test_failed_session_write_restores_resource() {
        let fx = Fixture::with_failing_session_writes().await;
        let resource = fx.resource("printer", 3).await;
        let session = fx.open_session().await;

        fx.fail_session_writes(true);
        let err = fx.manager.check_out(session, resource).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);

        let doc = fx
            .manager
            .stores()
            .resources
            .find_by_id(resource)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.checked_out, 0);
        assert!(fx.session(session).await.resources.is_empty());
    }
}

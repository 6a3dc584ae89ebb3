//! Collection lock set.
//!
//! Every read-modify-write sequence holds the locks of all collections it
//! touches. Callers request a set of collections and the set is always
//! acquired in the canonical order Templates, Projects, Resources,
//! Sessions, so two callers can never wait on each other in a cycle.

use tokio::sync::{Mutex, MutexGuard};
use tracing::trace;

use reslib_core::types::Collection;

/// One exclusive lock per lockable collection.
#[derive(Debug, Default)]
pub struct CollectionLocks {
    templates: Mutex<()>,
    projects: Mutex<()>,
    resources: Mutex<()>,
    sessions: Mutex<()>,
}

/// Guards held for a set of collections. Dropping it releases them all.
#[derive(Debug)]
pub struct CollectionGuard<'a> {
    held: Vec<(Collection, MutexGuard<'a, ()>)>,
}

impl CollectionGuard<'_> {
    /// Whether the guard holds the collection's lock.
    pub fn holds(&self, collection: Collection) -> bool {
        self.held.iter().any(|(c, _)| *c == collection)
    }

    /// The collections held, in acquisition order.
    pub fn collections(&self) -> Vec<Collection> {
        self.held.iter().map(|(c, _)| *c).collect()
    }
}

impl CollectionLocks {
    /// Create an unlocked set.
    pub fn new() -> Self {
        Self::default()
    }

    fn mutex(&self, collection: Collection) -> Option<&Mutex<()>> {
        match collection {
            Collection::Templates => Some(&self.templates),
            Collection::Projects => Some(&self.projects),
            Collection::Resources => Some(&self.resources),
            Collection::Sessions => Some(&self.sessions),
            Collection::Settings => None,
        }
    }

    /// Acquire the locks of `collections` in canonical order.
    ///
    /// Duplicates and collections without a lock are ignored.
    pub async fn acquire(&self, collections: &[Collection]) -> CollectionGuard<'_> {
        let mut wanted: Vec<Collection> = collections
            .iter()
            .copied()
            .filter(|c| c.lock_rank().is_some())
            .collect();
        wanted.sort_by_key(|c| c.lock_rank());
        wanted.dedup();

        let mut held = Vec::with_capacity(wanted.len());
        for collection in wanted {
            if let Some(mutex) = self.mutex(collection) {
                held.push((collection, mutex.lock().await));
                trace!(collection = %collection, "Collection lock acquired");
            }
        }
        CollectionGuard { held }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_acquires_in_canonical_order() {
        let locks = CollectionLocks::new();
        let guard = locks
            .acquire(&[
                Collection::Sessions,
                Collection::Templates,
                Collection::Resources,
                Collection::Sessions,
                Collection::Settings,
            ])
            .await;
        assert_eq!(
            guard.collections(),
            vec![
                Collection::Templates,
                Collection::Resources,
                Collection::Sessions
            ]
        );
        assert!(!guard.holds(Collection::Projects));
    }

    #[tokio::test]
    async fn test_guard_excludes_and_releases() {
        let locks = CollectionLocks::new();
        let guard = locks.acquire(&[Collection::Resources]).await;

        let blocked =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire(&[Collection::Resources]))
                .await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire(&[Collection::Resources]))
                .await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_reversed_requests_do_not_deadlock() {
        let locks = Arc::new(CollectionLocks::new());
        let mut tasks = Vec::new();
        for i in 0..32 {
            let locks = Arc::clone(&locks);
            tasks.push(tokio::spawn(async move {
                let order = if i % 2 == 0 {
                    [Collection::Resources, Collection::Sessions]
                } else {
                    [Collection::Sessions, Collection::Resources]
                };
                let _guard = locks.acquire(&order).await;
                tokio::task::yield_now().await;
            }));
        }

        let all = futures::future::join_all(tasks);
        let finished = tokio::time::timeout(Duration::from_secs(5), all).await;
        assert!(finished.is_ok());
    }
}

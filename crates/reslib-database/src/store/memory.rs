//! Process-local document store.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use tokio::sync::RwLock;

use reslib_core::error::AppError;
use reslib_core::result::AppResult;
use reslib_core::traits::{Document, DocumentStore};
use reslib_core::types::{Filter, ObjectId};

/// In-memory document store keyed by [`ObjectId`].
///
/// Identifiers are time-ordered, so iterating the map yields documents in
/// creation order.
pub struct MemoryDocumentStore<D: Document> {
    docs: RwLock<BTreeMap<ObjectId, D>>,
}

impl<D: Document> MemoryDocumentStore<D> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

impl<D: Document> Default for MemoryDocumentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> fmt::Debug for MemoryDocumentStore<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocumentStore")
            .field("collection", &D::COLLECTION)
            .finish_non_exhaustive()
    }
}

fn matches<D: Document>(filter: &Filter, doc: &D) -> AppResult<bool> {
    if filter.fields.is_empty() {
        return Ok(true);
    }
    Ok(filter.matches(&serde_json::to_value(doc)?))
}

#[async_trait]
impl<D: Document> DocumentStore<D> for MemoryDocumentStore<D> {
    async fn insert(&self, doc: &D) -> AppResult<()> {
        let mut docs = self.docs.write().await;
        let id: ObjectId = doc.id().into();
        if docs.contains_key(&id) {
            return Err(AppError::database(format!(
                "Duplicate id {id} in {}",
                D::COLLECTION
            )));
        }
        docs.insert(id, doc.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: D::Id) -> AppResult<Option<D>> {
        let key: ObjectId = id.into();
        Ok(self.docs.read().await.get(&key).cloned())
    }

    async fn find_first(&self, filter: &Filter) -> AppResult<Option<D>> {
        let docs = self.docs.read().await;
        for doc in docs.values() {
            if matches(filter, doc)? {
                return Ok(Some(doc.clone()));
            }
        }
        Ok(None)
    }

    async fn find_all(&self, filter: &Filter) -> AppResult<Vec<D>> {
        let docs = self.docs.read().await;
        let mut found = Vec::new();
        for doc in docs.values() {
            if matches(filter, doc)? {
                found.push(doc.clone());
            }
        }
        Ok(found)
    }

    async fn update(&self, doc: &D) -> AppResult<bool> {
        let key: ObjectId = doc.id().into();
        let mut docs = self.docs.write().await;
        match docs.get_mut(&key) {
            Some(slot) => {
                *slot = doc.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: D::Id) -> AppResult<bool> {
        let key: ObjectId = id.into();
        Ok(self.docs.write().await.remove(&key).is_some())
    }
}

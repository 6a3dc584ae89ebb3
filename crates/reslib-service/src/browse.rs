//! Read-only views over whole collections.

use std::sync::Arc;

use serde_json::Value;

use reslib_core::error::AppError;
use reslib_core::result::AppResult;
use reslib_core::traits::{Document, DocumentStore};
use reslib_core::types::{Collection, Filter, ObjectId};
use reslib_database::Stores;
use reslib_lease::CollectionLocks;

const COLLECTION_NOT_FOUND: &str = "collection not found";

/// Dumps the documents of a named collection as JSON.
///
/// Only the lockable collections are browsable; the settings collection
/// holds the signing key and is never exposed.
#[derive(Debug, Clone)]
pub struct CollectionBrowser {
    stores: Stores,
    locks: Arc<CollectionLocks>,
}

impl CollectionBrowser {
    pub fn new(stores: Stores, locks: Arc<CollectionLocks>) -> Self {
        Self { stores, locks }
    }

    /// Resolve a collection by its public name.
    pub fn resolve(name: &str) -> AppResult<Collection> {
        Collection::LOCKABLE
            .into_iter()
            .find(|c| c.table_name() == name)
            .ok_or_else(|| AppError::not_found(COLLECTION_NOT_FOUND))
    }

    /// Every document in `name`, in creation order. An empty collection
    /// yields an empty list.
    pub async fn list(&self, name: &str) -> AppResult<Vec<Value>> {
        let collection = Self::resolve(name)?;
        let _guard = self.locks.acquire(&[collection]).await;
        match collection {
            Collection::Templates => dump(self.stores.templates.as_ref()).await,
            Collection::Projects => dump(self.stores.projects.as_ref()).await,
            Collection::Resources => dump(self.stores.resources.as_ref()).await,
            Collection::Sessions => dump(self.stores.sessions.as_ref()).await,
            Collection::Settings => Err(AppError::not_found(COLLECTION_NOT_FOUND)),
        }
    }

    /// One document of `name` by id.
    pub async fn get(&self, name: &str, id: &str) -> AppResult<Value> {
        let collection = Self::resolve(name)?;
        let id = ObjectId::parse(id)?;
        let _guard = self.locks.acquire(&[collection]).await;
        match collection {
            Collection::Templates => {
                fetch(self.stores.templates.as_ref(), id, "template not found").await
            }
            Collection::Projects => {
                fetch(self.stores.projects.as_ref(), id, "project not found").await
            }
            Collection::Resources => {
                fetch(self.stores.resources.as_ref(), id, "resource not found").await
            }
            Collection::Sessions => {
                fetch(self.stores.sessions.as_ref(), id, "session not found").await
            }
            Collection::Settings => Err(AppError::not_found(COLLECTION_NOT_FOUND)),
        }
    }
}

async fn dump<D: Document>(store: &dyn DocumentStore<D>) -> AppResult<Vec<Value>> {
    store
        .find_all(&Filter::all())
        .await?
        .into_iter()
        .map(|doc| serde_json::to_value(&doc).map_err(AppError::from))
        .collect()
}

async fn fetch<D>(store: &dyn DocumentStore<D>, id: ObjectId, missing: &str) -> AppResult<Value>
where
    D: Document,
    D::Id: From<ObjectId>,
{
    let doc = store
        .find_by_id(D::Id::from(id))
        .await?
        .ok_or_else(|| AppError::not_found(missing))?;
    Ok(serde_json::to_value(&doc)?)
}

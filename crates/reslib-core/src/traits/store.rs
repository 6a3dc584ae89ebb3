//! Generic document store trait.

use std::fmt::{Debug, Display};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::result::AppResult;
use crate::types::collection::Collection;
use crate::types::filter::Filter;
use crate::types::id::ObjectId;

/// A document that can be persisted in a [`DocumentStore`].
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// The collection this document lives in.
    const COLLECTION: Collection;

    /// The typed identifier of the document.
    type Id: Copy + Into<ObjectId> + Display + Debug + Send + Sync + 'static;

    /// Return the document identifier.
    fn id(&self) -> Self::Id;
}

/// Persistence operations for one document collection.
///
/// Each operation is a single logical document read or write; callers that
/// need multi-document consistency hold the collection locks around the
/// sequence. `find_all` returns documents in creation order.
#[async_trait]
pub trait DocumentStore<D: Document>: Send + Sync + Debug + 'static {
    /// Insert a new document. Fails with a database error if the id exists.
    async fn insert(&self, doc: &D) -> AppResult<()>;

    /// Find a document by its identifier.
    async fn find_by_id(&self, id: D::Id) -> AppResult<Option<D>>;

    /// Find the first document (in creation order) matching the filter.
    async fn find_first(&self, filter: &Filter) -> AppResult<Option<D>>;

    /// Find every document matching the filter, in creation order.
    async fn find_all(&self, filter: &Filter) -> AppResult<Vec<D>>;

    /// Replace a document by id. Returns `false` if no such document exists.
    async fn update(&self, doc: &D) -> AppResult<bool>;

    /// Delete a document by id. Returns `false` if no such document existed.
    async fn delete(&self, id: D::Id) -> AppResult<bool>;
}

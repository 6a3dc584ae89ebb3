//! PostgreSQL JSONB document store.
//!
//! Each collection is a table of `(id, doc, created_at, updated_at)`.
//! Filters are evaluated with JSONB containment (`doc @> $1`), ordering by
//! id gives creation order.

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use reslib_core::error::{AppError, ErrorKind};
use reslib_core::result::AppResult;
use reslib_core::traits::{Document, DocumentStore};
use reslib_core::types::{Filter, ObjectId};

/// Document store backed by one PostgreSQL table.
pub struct PgDocumentStore<D: Document> {
    pool: PgPool,
    _doc: PhantomData<fn() -> D>,
}

impl<D: Document> PgDocumentStore<D> {
    /// Create a store over the collection's table.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _doc: PhantomData,
        }
    }

    fn table() -> &'static str {
        D::COLLECTION.table_name()
    }

    fn db_error(action: &str, e: sqlx::Error) -> AppError {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to {action} in {}", D::COLLECTION),
            e,
        )
    }

    fn decode(value: Value) -> AppResult<D> {
        serde_json::from_value(value).map_err(AppError::from)
    }
}

impl<D: Document> Clone for PgDocumentStore<D> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<D: Document> fmt::Debug for PgDocumentStore<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgDocumentStore")
            .field("table", &Self::table())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<D: Document> DocumentStore<D> for PgDocumentStore<D> {
    async fn insert(&self, doc: &D) -> AppResult<()> {
        let id: ObjectId = doc.id().into();
        let value = serde_json::to_value(doc)?;
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", Self::table());
        sqlx::query(&sql)
            .bind(id.to_string())
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_error("insert document", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: D::Id) -> AppResult<Option<D>> {
        let id: ObjectId = id.into();
        let sql = format!("SELECT doc FROM {} WHERE id = $1", Self::table());
        sqlx::query_scalar::<_, Value>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("find document", e))?
            .map(Self::decode)
            .transpose()
    }

    async fn find_first(&self, filter: &Filter) -> AppResult<Option<D>> {
        let sql = format!(
            "SELECT doc FROM {} WHERE doc @> $1 ORDER BY id ASC LIMIT 1",
            Self::table()
        );
        sqlx::query_scalar::<_, Value>(&sql)
            .bind(filter.to_containment())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("find document", e))?
            .map(Self::decode)
            .transpose()
    }

    async fn find_all(&self, filter: &Filter) -> AppResult<Vec<D>> {
        let sql = format!(
            "SELECT doc FROM {} WHERE doc @> $1 ORDER BY id ASC",
            Self::table()
        );
        sqlx::query_scalar::<_, Value>(&sql)
            .bind(filter.to_containment())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::db_error("list documents", e))?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    async fn update(&self, doc: &D) -> AppResult<bool> {
        let id: ObjectId = doc.id().into();
        let value = serde_json::to_value(doc)?;
        let sql = format!(
            "UPDATE {} SET doc = $2, updated_at = NOW() WHERE id = $1",
            Self::table()
        );
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_error("update document", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: D::Id) -> AppResult<bool> {
        let id: ObjectId = id.into();
        let sql = format!("DELETE FROM {} WHERE id = $1", Self::table());
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_error("delete document", e))?;
        Ok(result.rows_affected() > 0)
    }
}

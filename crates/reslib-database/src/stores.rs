//! The bundle of collection stores handed to services and the lease manager.

use std::sync::Arc;

use tracing::info;

use reslib_core::config::database::{DatabaseConfig, StoreBackend};
use reslib_core::result::AppResult;
use reslib_core::traits::DocumentStore;
use reslib_entity::{GlobalSetting, Project, Resource, Session, Template};

use crate::connection::DatabasePool;
use crate::migration::{run_migrations, verify_collections};
use crate::store::{MemoryDocumentStore, PgDocumentStore};

/// One store per collection, all on the same backend.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Templates collection.
    pub templates: Arc<dyn DocumentStore<Template>>,
    /// Projects collection.
    pub projects: Arc<dyn DocumentStore<Project>>,
    /// Resources collection.
    pub resources: Arc<dyn DocumentStore<Resource>>,
    /// Sessions collection.
    pub sessions: Arc<dyn DocumentStore<Session>>,
    /// Global settings collection.
    pub settings: Arc<dyn DocumentStore<GlobalSetting>>,
    pool: Option<DatabasePool>,
}

impl Stores {
    /// Fresh, empty in-memory collections.
    pub fn in_memory() -> Self {
        Self {
            templates: Arc::new(MemoryDocumentStore::new()),
            projects: Arc::new(MemoryDocumentStore::new()),
            resources: Arc::new(MemoryDocumentStore::new()),
            sessions: Arc::new(MemoryDocumentStore::new()),
            settings: Arc::new(MemoryDocumentStore::new()),
            pool: None,
        }
    }

    /// Collections backed by PostgreSQL tables.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            templates: Arc::new(PgDocumentStore::new(pg.clone())),
            projects: Arc::new(PgDocumentStore::new(pg.clone())),
            resources: Arc::new(PgDocumentStore::new(pg.clone())),
            sessions: Arc::new(PgDocumentStore::new(pg.clone())),
            settings: Arc::new(PgDocumentStore::new(pg)),
            pool: Some(pool),
        }
    }

    /// Open the configured backend, running migrations when enabled.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(backend = %config.backend, "Opening document store");
        match config.backend {
            StoreBackend::Memory => Ok(Self::in_memory()),
            StoreBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                } else {
                    verify_collections(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
        }
    }

    /// The PostgreSQL pool, when on that backend.
    pub fn pool(&self) -> Option<&DatabasePool> {
        self.pool.as_ref()
    }

    /// Check backend connectivity. Always healthy in memory.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Close backend connections, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

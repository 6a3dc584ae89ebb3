//! Embedded schema for the document collections.
//!
//! Each collection is one `(id, doc JSONB)` table. With migrations disabled
//! the backend only checks that every table is present.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use reslib_core::error::{AppError, ErrorKind};
use reslib_core::types::Collection;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Every collection with a backing table.
pub const TABLE_COLLECTIONS: [Collection; 5] = [
    Collection::Templates,
    Collection::Projects,
    Collection::Resources,
    Collection::Sessions,
    Collection::Settings,
];

/// Apply pending migrations, then confirm every collection table exists.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(
        migrations = MIGRATOR.iter().count(),
        "Applying document collection schema"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    verify_collections(pool).await?;
    info!("Document collection schema up to date");
    Ok(())
}

/// Fail with a configuration error naming every missing collection table.
pub async fn verify_collections(pool: &PgPool) -> Result<(), AppError> {
    let mut missing = Vec::new();
    for collection in TABLE_COLLECTIONS {
        let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(collection.table_name())
            .fetch_one(pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to inspect table {collection}"),
                    e,
                )
            })?;
        if !exists {
            missing.push(collection.table_name());
        }
    }

    match missing_tables_error(&missing) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn missing_tables_error(missing: &[&str]) -> Option<AppError> {
    if missing.is_empty() {
        return None;
    }
    Some(AppError::configuration(format!(
        "document tables missing: {}; run `reslib-cli migrate run`",
        missing.join(", ")
    )))
}

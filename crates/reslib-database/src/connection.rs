//! Connection pool for the PostgreSQL document backend.
//!
//! The URL is parsed before any network traffic so that a malformed or
//! missing `database.url` surfaces as a configuration error. Every pooled
//! connection identifies itself as `reslib` in `pg_stat_activity`.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use reslib_core::config::database::DatabaseConfig;
use reslib_core::error::{AppError, ErrorKind};

const APPLICATION_NAME: &str = "reslib";

/// Pool shared by every collection table.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let options = connect_options(&config.url)?;
        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Opening PostgreSQL document backend"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to reach the document backend: {e}"),
                    e,
                )
            })?;

        info!("PostgreSQL document backend ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Document backend pool closed");
    }
}

/// Parse the configured URL into connect options.
fn connect_options(url: &str) -> Result<PgConnectOptions, AppError> {
    if url.trim().is_empty() {
        return Err(AppError::configuration(
            "database.url is required for the postgres backend",
        ));
    }
    let options = PgConnectOptions::from_str(url).map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("invalid database.url '{}'", mask_password(url)),
            e,
        )
    })?;
    Ok(options.application_name(APPLICATION_NAME))
}

/// Mask the password portion of a database URL for safe logging.
fn mask_password(url: &str) -> String {
    let Some(at_pos) = url.find('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    match url[..at_pos].rfind(':') {
        Some(colon_pos) if colon_pos > scheme_end => {
            format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use reslib_core::config::database::StoreBackend;

    use super::*;

    #[test]
    fn test_mask_password() {
        assert_eq!(
            mask_password("postgres://reslib:secret@db:5432/reslib"),
            "postgres://reslib:****@db:5432/reslib"
        );
        assert_eq!(
            mask_password("postgres://db:5432/reslib"),
            "postgres://db:5432/reslib"
        );
        assert_eq!(
            mask_password("postgres://reslib@db/reslib"),
            "postgres://reslib@db/reslib"
        );
    }

    #[test]
    fn test_connect_options() {
        let options = connect_options("postgres://reslib:secret@db:5432/leases").unwrap();
        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_database(), Some("leases"));
        assert_eq!(options.get_application_name(), Some(APPLICATION_NAME));
    }

    #[tokio::test]
    async fn test_missing_url_is_a_configuration_error() {
        let config = DatabaseConfig {
            backend: StoreBackend::Postgres,
            ..DatabaseConfig::default()
        };
        let err = DatabasePool::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);

        let err = connect_options("not a url").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}

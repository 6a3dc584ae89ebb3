//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an environment overlay and `RESLIB__*`
//! environment variables. Each sub-module is one configuration section.

pub mod auth;
pub mod database;
pub mod logging;
pub mod server;
pub mod session;

use serde::{Deserialize, Serialize};

use self::auth::AuthConfig;
use self::database::{DatabaseConfig, StoreBackend};
use self::logging::LoggingConfig;
use self::server::ServerConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Environment variable naming the configuration overlay to load.
pub const ENV_VAR: &str = "RESLIB_ENV";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Document store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session lease settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Credential and key settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default`, `config/{env}` (both optional) and
    /// environment variables prefixed with `RESLIB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("RESLIB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration for the environment named by `RESLIB_ENV`.
    pub fn load_from_env() -> Result<Self, AppError> {
        let env = std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string());
        Self::load(&env)
    }

    /// Check cross-field constraints the deserializer cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if !session::TTL_RANGE.contains(&self.session.ttl_hours) {
            return Err(AppError::configuration(format!(
                "session.ttl_hours must be between {} and {}, got {}",
                session::TTL_RANGE.start(),
                session::TTL_RANGE.end(),
                self.session.ttl_hours
            )));
        }
        if self.auth.signing_key_bytes == 0 {
            return Err(AppError::configuration(
                "auth.signing_key_bytes must be greater than zero",
            ));
        }
        if self.auth.api_key_bytes == 0 {
            return Err(AppError::configuration(
                "auth.api_key_bytes must be greater than zero",
            ));
        }
        if self.auth.signing_key_setting.trim().is_empty() {
            return Err(AppError::configuration(
                "auth.signing_key_setting must not be empty",
            ));
        }
        if self.database.backend == StoreBackend::Postgres && self.database.url.trim().is_empty()
        {
            return Err(AppError::configuration(
                "database.url is required for the postgres backend",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::session::RecoveryPolicy;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.ttl_hours, 8);
        assert_eq!(config.session.recovery_policy, RecoveryPolicy::FreshWindow);
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.auth.signing_key_setting, "signingKey");
        assert_eq!(config.auth.signing_key_bytes, 256);
        assert_eq!(config.auth.api_key_bytes, 64);
    }

    #[test]
    fn test_ttl_out_of_range_rejected() {
        for ttl in [0, 24, 100] {
            let mut config = AppConfig::default();
            config.session.ttl_hours = ttl;
            let err = config.validate().unwrap_err();
            assert_eq!(err.kind, ErrorKind::Configuration);
        }
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Postgres;
        assert!(config.validate().is_err());

        config.database.url = "postgres://localhost/reslib".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_key_sizes_rejected() {
        let mut config = AppConfig::default();
        config.auth.api_key_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.auth.signing_key_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"session": {"ttl_hours": 2, "recovery_policy": "preserve_expiry"}}"#,
        )
        .expect("deserialize");
        assert_eq!(config.session.ttl_hours, 2);
        assert_eq!(config.session.recovery_policy, RecoveryPolicy::PreserveExpiry);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }
}

//! Bootstrap of the persisted credential signing secret.

use tracing::{error, info};

use reslib_core::config::auth::AuthConfig;
use reslib_core::error::AppError;
use reslib_core::keys;
use reslib_core::result::AppResult;
use reslib_core::traits::DocumentStore;
use reslib_core::types::Filter;
use reslib_entity::GlobalSetting;

/// Message returned when the stored secret cannot be used.
pub const SIGNING_KEY_ERROR: &str = "JWT signing key corrupted or missing";

/// Load the signing secret from the settings collection, creating and
/// persisting a fresh one on first start.
pub async fn load_or_create_signing_key(
    settings: &dyn DocumentStore<GlobalSetting>,
    config: &AuthConfig,
) -> AppResult<Vec<u8>> {
    let filter = Filter::eq("key", config.signing_key_setting.as_str());

    if let Some(setting) = settings.find_first(&filter).await? {
        let secret = setting
            .value
            .as_str()
            .and_then(keys::decode_secret)
            .filter(|bytes| !bytes.is_empty());
        return match secret {
            Some(bytes) => {
                info!(setting = %config.signing_key_setting, "Loaded signing key");
                Ok(bytes)
            }
            None => {
                error!(setting = %config.signing_key_setting, "Stored signing key is unusable");
                Err(AppError::internal(SIGNING_KEY_ERROR))
            }
        };
    }

    let secret = keys::random_bytes(config.signing_key_bytes);
    let setting = GlobalSetting::new(
        config.signing_key_setting.clone(),
        serde_json::Value::String(keys::encode_secret(&secret)),
    );
    settings.insert(&setting).await?;
    info!(
        setting = %config.signing_key_setting,
        bytes = config.signing_key_bytes,
        "Generated new signing key"
    );
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use reslib_core::error::ErrorKind;
    use reslib_database::store::MemoryDocumentStore;

    use super::*;

    #[tokio::test]
    async fn test_created_once_then_reused() {
        let store = MemoryDocumentStore::<GlobalSetting>::new();
        let config = AuthConfig::default();

        let first = load_or_create_signing_key(&store, &config).await.unwrap();
        assert_eq!(first.len(), 256);
        let second = load_or_create_signing_key(&store, &config).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_corrupt_key_is_internal() {
        let store = MemoryDocumentStore::<GlobalSetting>::new();
        let config = AuthConfig::default();
        store
            .insert(&GlobalSetting::new("signingKey", serde_json::json!(42)))
            .await
            .unwrap();

        let err = load_or_create_signing_key(&store, &config)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.message, SIGNING_KEY_ERROR);
    }
}

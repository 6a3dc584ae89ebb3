//! Global setting document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reslib_core::traits::Document;
use reslib_core::types::{Collection, SettingId};

/// A process-wide setting, such as the credential signing key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSetting {
    /// Unique setting identifier.
    pub id: SettingId,
    /// Setting key.
    pub key: String,
    /// Setting value.
    pub value: serde_json::Value,
    /// When the setting was created.
    pub created_at: DateTime<Utc>,
    /// When the setting was last updated.
    pub updated_at: DateTime<Utc>,
}

impl GlobalSetting {
    /// Build a new setting.
    pub fn new(key: impl Into<String>, value: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: SettingId::new(),
            key: key.into(),
            value,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for GlobalSetting {
    const COLLECTION: Collection = Collection::Settings;
    type Id = SettingId;

    fn id(&self) -> SettingId {
        self.id
    }
}

//! Session lease configuration.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Accepted range for `session.ttl_hours`.
pub const TTL_RANGE: RangeInclusive<u64> = 1..=23;

/// How expiry timers are re-established for sessions found at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Every recovered session gets a full new window.
    #[default]
    FreshWindow,
    /// Recovered sessions expire at their persisted expiry instant.
    PreserveExpiry,
}

/// Session lease configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in hours; renewing restarts the window.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Expiry recovery policy applied at startup.
    #[serde(default)]
    pub recovery_policy: RecoveryPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            recovery_policy: RecoveryPolicy::default(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    8
}

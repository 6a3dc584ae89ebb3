//! Credential and key configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Settings key under which the signing secret is persisted.
    #[serde(default = "default_signing_key_setting")]
    pub signing_key_setting: String,
    /// Size of a freshly generated signing secret, in bytes.
    #[serde(default = "default_signing_key_bytes")]
    pub signing_key_bytes: usize,
    /// Size of a project API key before encoding, in bytes.
    #[serde(default = "default_api_key_bytes")]
    pub api_key_bytes: usize,
    /// Clock skew tolerated when verifying token expiry, in seconds.
    #[serde(default = "default_leeway")]
    pub token_leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_key_setting: default_signing_key_setting(),
            signing_key_bytes: default_signing_key_bytes(),
            api_key_bytes: default_api_key_bytes(),
            token_leeway_seconds: default_leeway(),
        }
    }
}

fn default_signing_key_setting() -> String {
    "signingKey".to_string()
}

fn default_signing_key_bytes() -> usize {
    256
}

fn default_api_key_bytes() -> usize {
    64
}

fn default_leeway() -> u64 {
    5
}

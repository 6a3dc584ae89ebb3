//! Random key material for API keys and credential signing secrets.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};

/// Return `len` bytes from the thread-local CSPRNG.
pub fn random_bytes(len: usize) -> Vec<u8> {
    std::iter::repeat_with(rand::random::<u8>)
        .take(len)
        .collect()
}

/// Generate a URL-safe base64 key from `len` random bytes.
pub fn generate_key(len: usize) -> String {
    URL_SAFE.encode(random_bytes(len))
}

/// Encode raw secret bytes for storage.
pub fn encode_secret(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a secret previously produced by [`encode_secret`].
pub fn decode_secret(encoded: &str) -> Option<Vec<u8>> {
    STANDARD.decode(encoded).ok()
}

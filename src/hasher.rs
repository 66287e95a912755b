//! Digest and secret generation for bearer tokens.
//!
//! Raw secrets are handed to the caller exactly once and never persisted;
//! storage and the audit trail only ever see the SHA-256 digest.

use base64::Engine as _;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// SHA-256 hash of a raw token value, returned as lowercase hex.
/// Deterministic, so the digest doubles as the storage lookup key.
pub fn hash(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a new raw secret: 256 bits from the OS CSPRNG, encoded
/// base64 URL-safe without padding.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash("my-token"), hash("my-token"));
    }

    #[test]
    fn hash_is_lowercase_hex_sha256() {
        let digest = hash("abc");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        // known vector
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn distinct_inputs_hash_differently() {
        assert_ne!(hash("token-a"), hash("token-b"));
    }

    #[test]
    fn secrets_are_url_safe_and_unpadded() {
        let secret = generate_secret();
        // 32 bytes -> 43 base64 chars, no '=' padding
        assert_eq!(secret.len(), 43);
        assert!(!secret.contains('='));
        assert!(!secret.contains('+'));
        assert!(!secret.contains('/'));
    }

    #[test]
    fn secrets_do_not_repeat() {
        assert_ne!(generate_secret(), generate_secret());
    }
}

//! Opaque key generation for entities, secret links, and API keys.
//!
//! All public identifiers in the platform are opaque strings produced
//! here; numeric row IDs never leave the storage layer.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Alphabet for temporary passwords, with visually ambiguous
/// characters (0/O, 1/l/I) removed.
const PASSWORD_ALPHABET: &[u8] = b"23456789abcdefghjkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ!@#%&$?*";

/// Generate an entity key: 32 random bytes, base64url-encoded without
/// padding (43 characters).
pub fn entity_key() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a unique key: SHA-256 of a nanosecond timestamp
/// concatenated with a random integer, hex-encoded.
pub fn unique_key() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let random_int: i32 = rand::rng().random();
    let combined = format!("{nanos}{random_int}");

    let mut hasher = Sha256::new();
    hasher.update(combined.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate an API key: SHA-256 of a fresh unique key, hex-encoded.
pub fn api_key() -> String {
    let mut hasher = Sha256::new();
    hasher.update(unique_key().as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate an 8-character temporary password from the
/// ambiguity-reduced alphabet.
pub fn temporary_password() -> String {
    let mut rng = rand::rng();
    (0..8)
        .map(|_| {
            let idx = rng.random_range(0..PASSWORD_ALPHABET.len());
            PASSWORD_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_key_is_url_safe() {
        let key = entity_key();
        assert_eq!(key.len(), 43);
        assert!(
            key.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn entity_keys_are_unique() {
        assert_ne!(entity_key(), entity_key());
    }

    #[test]
    fn unique_key_is_sha256_hex() {
        let key = unique_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn api_key_is_sha256_hex() {
        let key = api_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn temporary_password_uses_reduced_alphabet() {
        for _ in 0..50 {
            let pw = temporary_password();
            assert_eq!(pw.len(), 8);
            assert!(pw.bytes().all(|b| PASSWORD_ALPHABET.contains(&b)));
            // Ambiguous characters never appear.
            assert!(!pw.contains(['0', 'O', '1', 'l', 'I', 'o', 'i']));
        }
    }
}

//! Account domain model and password digest helpers.
//!
//! # Invariants
//! - `username` is unique across the store.
//! - `password_hash` is always a 64-char lowercase hex SHA-256 digest, never
//!   plaintext.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Stable account identifier; also the value persisted by the session holder.
pub type AccountId = Uuid;

/// Length of a hex-encoded SHA-256 digest.
pub const PASSWORD_HASH_LEN: usize = 64;

/// Persisted account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    /// Hex digest of the plaintext password.
    pub password_hash: String,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Account {
    /// Returns whether `plaintext` hashes to this account's stored digest.
    pub fn password_matches(&self, plaintext: &str) -> bool {
        verify_password(plaintext, &self.password_hash)
    }
}

/// Hashes a plaintext password into its fixed-length hex digest.
pub fn hash_password(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares a plaintext password against a stored digest in constant time.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    let candidate = hash_password(plaintext);
    bool::from(candidate.as_bytes().ct_eq(stored_hash.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password, PASSWORD_HASH_LEN};

    #[test]
    fn hash_is_fixed_length_hex_and_not_plaintext() {
        let hash = hash_password("Secret123");
        assert_eq!(hash.len(), PASSWORD_HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hash, "Secret123");
        assert_eq!(hash_password("x").len(), PASSWORD_HASH_LEN);
    }

    #[test]
    fn verify_accepts_same_plaintext_only() {
        let stored = hash_password("Secret123");
        assert!(verify_password("Secret123", &stored));
        assert!(!verify_password("secret123", &stored));
        assert!(!verify_password("Secret123", "deadbeef"));
    }
}

//! Password-reset token helpers.
//!
//! Reset tokens are opaque random strings mailed to the department; only
//! their SHA-256 digest is stored on the department row, so a database
//! leak does not expose usable links.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Reset-token validity window in minutes.
pub const RESET_TOKEN_EXPIRY_MINS: i64 = 60;

/// Generate a random reset token.
///
/// Returns `(plaintext_token, sha256_hex_digest)`. The plaintext goes into
/// the mailed link; only the digest is persisted.
pub fn generate_reset_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let digest = hash_reset_token(&plaintext);
    (plaintext, digest)
}

/// Compute the SHA-256 hex digest of a reset token.
///
/// Use this to compare an incoming token against the stored digest.
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable() {
        let (plaintext, digest) = generate_reset_token();
        assert_eq!(digest, hash_reset_token(&plaintext));
        assert_eq!(digest.len(), 64); // SHA-256 hex
    }

    #[test]
    fn tokens_are_unique() {
        let (a, _) = generate_reset_token();
        let (b, _) = generate_reset_token();
        assert_ne!(a, b);
    }
}

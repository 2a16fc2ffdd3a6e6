//! Password hashing and verification
//!
//! Thin wrapper over bcrypt. Every hash embeds its own salt and cost, so the
//! work factor can be raised over time without invalidating stored hashes.

use thiserror::Error;

/// Password hashing errors
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("password must not be empty")]
    EmptyPassword,

    #[error("password hashing failed: {0}")]
    HashingFailed(String),
}

/// Hash a plaintext password with a fresh random salt at the given cost.
///
/// Fails only on empty input; the cost is validated by the configuration
/// layer before it ever reaches this function.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, PasswordError> {
    if plaintext.is_empty() {
        return Err(PasswordError::EmptyPassword);
    }

    bcrypt::hash(plaintext, cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

/// Verify a plaintext password against a stored hash.
///
/// Recomputes with the salt and cost embedded in `hashed` and compares in
/// constant time. Returns false for any mismatch, including hashes that do
/// not parse at all.
pub fn verify_password(plaintext: &str, hashed: &str) -> bool {
    match bcrypt::verify(plaintext, hashed) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::debug!(error = %e, "stored password hash could not be parsed");
            false
        }
    }
}

//! Password hashing with Argon2
//!
//! Hashes carry their own random salt and parameters in PHC string form.
//! The async variants move the work onto tokio's blocking pool.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

use crate::error::ServiceError;

/// Hash a plaintext password with a fresh salt
pub fn hash(plaintext: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(hash)
}

/// Check a plaintext password against a stored hash
///
/// An unparsable stored hash counts as a mismatch.
pub fn verify(stored_hash: &str, plaintext: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// [`hash`] on the blocking thread pool
pub async fn hash_blocking(plaintext: String) -> Result<String, ServiceError> {
    tokio::task::spawn_blocking(move || hash(&plaintext))
        .await
        .map_err(|e| ServiceError::Internal(e.into()))?
}

/// [`verify`] on the blocking thread pool
pub async fn verify_blocking(stored_hash: String, plaintext: String) -> Result<bool, ServiceError> {
    tokio::task::spawn_blocking(move || verify(&stored_hash, &plaintext))
        .await
        .map_err(|e| ServiceError::Internal(e.into()))
}

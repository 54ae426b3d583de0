/// Password hashing and verification using Argon2id
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash,
};

use crate::error::{Result, SessionError};

/// One-way hash comparison seam. The session core only ever asks "does this
/// plaintext match this stored hash"; hashing parameters and storage of the
/// hash belong to the caller.
pub trait PasswordVerifier: Send + Sync {
    /// Constant-time comparison of a plaintext credential against a stored
    /// hash. A mismatch is an expected outcome, not an error.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Default verifier backed by Argon2id.
#[derive(Debug, Default)]
pub struct Argon2PasswordVerifier;

impl PasswordVerifier for Argon2PasswordVerifier {
    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };
        argon2::PasswordVerifier::verify_password(
            &Argon2::default(),
            password.as_bytes(),
            &parsed_hash,
        )
        .is_ok()
    }
}

/// Hash a password using Argon2id.
/// Returns the hash string suitable for storage in the user directory.
pub fn hash_password(password: &str) -> Result<String> {
    if password.len() < 8 {
        return Err(SessionError::WeakPassword);
    }

    let salt = SaltString::generate(rand::thread_rng());
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| SessionError::Storage("failed to hash password".to_string()))?
        .to_string();

    Ok(password_hash)
}

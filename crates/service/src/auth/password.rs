//! Argon2id password hashing for student and admin accounts.
//!
//! Hashes are stored as PHC strings, so the salt and parameters travel with
//! the hash. Hashing failures surface as [`CoreError::Internal`].

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use futsal_core::error::CoreError;

/// Shortest password accepted when one is chosen by hand.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hash a plaintext password with a random salt.
pub fn hash_password(password: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))
}

/// Check a plaintext password against a stored hash.
///
/// A mismatch is `Ok(false)`; only a malformed hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CoreError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| CoreError::Internal(format!("Stored password hash is invalid: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CoreError::Internal(format!(
            "Password verification error: {e}"
        ))),
    }
}

/// Reject blank or too-short passwords.
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    if password.trim().is_empty() {
        return Err(CoreError::Validation("Password must not be empty".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

//! Password hashing for stored credentials.
//!
//! Passwords are hashed with Argon2 (default parameters, random salt) and stored as
//! PHC strings. Collections only ever see the hash.

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Hashes `plaintext` into an Argon2 PHC string.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Credential`] if hashing fails.
pub fn hash_password(plaintext: &str) -> DocumentStoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DocumentStoreError::Credential(format!("failed to hash password: {e}")))
}

/// Checks `plaintext` against a hash produced by [`hash_password`].
///
/// Returns `Ok(false)` for a wrong password.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Credential`] if `hash` is not a valid PHC string.
pub fn verify_password(plaintext: &str, hash: &str) -> DocumentStoreResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| DocumentStoreError::Credential(format!("malformed password hash: {e}")))?;

    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(DocumentStoreError::Credential(format!("failed to verify password: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("chess456").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, "chess456");
        assert!(verify_password("chess456", &hash).unwrap());
        assert!(!verify_password("chess457", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("art123").unwrap(), hash_password("art123").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("art123", "not-a-hash"),
            Err(DocumentStoreError::Credential(_))
        ));
    }
}

//! Password hashing.
//!
//! Argon2id with a random salt per hash, stored as a PHC string.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::AuthError;

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Config(format!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash.
///
/// A stored hash that cannot be parsed is treated as a mismatch.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| {
        tracing::error!(error = %e, "Stored password hash is malformed");
        AuthError::InvalidCredentials
    })?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("pw").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password("pw", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let hash1 = hash_password("same").unwrap();
        let hash2 = hash_password("same").unwrap();
        assert_ne!(hash1, hash2);
        assert!(verify_password("same", &hash1).is_ok());
        assert!(verify_password("same", &hash2).is_ok());
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(matches!(
            verify_password("pw", "not-a-valid-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}

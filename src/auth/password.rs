//! Stored user credentials
//!
//! Passwords never reach the store in clear; `User::password` holds an
//! argon2id PHC string with its own random salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::types::CrmError;

/// Credential to keep on a `User` for the given clear-text password
pub fn hash_password(password: &str) -> Result<String, CrmError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CrmError::Internal(format!("Failed to hash password: {e}")))
}

/// Check a login attempt against a stored credential.
///
/// A mismatch is `Ok(false)`; only an unreadable stored value is an error.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, CrmError> {
    let stored = PasswordHash::new(stored)
        .map_err(|e| CrmError::Internal(format!("Stored credential is not a PHC string: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &stored)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_significant() {
        let hash = hash_password("  secret  ").unwrap();

        assert!(verify_password("  secret  ", &hash).unwrap());
        assert!(!verify_password("secret", &hash).unwrap());
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("password123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("password124", &hash).unwrap());
    }

    #[test]
    fn test_salted() {
        let hash1 = hash_password("p").unwrap();
        let hash2 = hash_password("p").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("p", &hash1).unwrap());
        assert!(verify_password("p", &hash2).unwrap());
    }

    #[test]
    fn test_plaintext_credential_is_rejected() {
        assert!(verify_password("password123", "password123").is_err());
    }
}

/// Password hashing and verification using Argon2id
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};

use crate::error::{AppError, Result};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 30;
pub const PASSWORD_LENGTH_MESSAGE: &str = "Password must be between 8 and 30 characters long";

/// Hash a password using Argon2id.
/// Returns the PHC string stored in `users.password_hash`.
pub fn hash_password(password: &str) -> Result<String> {
    validate_password_length(password)?;

    let salt = SaltString::generate(rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal("Failed to hash password".to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Check `password` against a stored hash. A mismatch is `Ok(false)`; only a
/// corrupt hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash format".to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn validate_password_length(password: &str) -> Result<()> {
    let len = password.chars().count();
    if (MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        Ok(())
    } else {
        Err(AppError::Validation(PASSWORD_LENGTH_MESSAGE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("amazing grace").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("amazing grace", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password() {
        let hash = hash_password("amazing grace").unwrap();
        assert!(!verify_password("amazing grade", &hash).unwrap());
    }

    #[test]
    fn test_length_bounds() {
        assert!(hash_password("short").is_err());
        assert!(hash_password(&"x".repeat(31)).is_err());
        assert!(hash_password(&"x".repeat(30)).is_ok());
        assert!(hash_password("12345678").is_ok());
    }

    #[test]
    fn test_corrupt_hash_is_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}

//! Password hashing with bcrypt.
//!
//! The stored value is the full bcrypt string (`$2b$<cost>$<salt><hash>`), so
//! salt and work factor travel with the hash.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("Password task failed: {0}")]
    Task(String),
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// `Ok(false)` on a wrong password; `Err` only when `hash` is not a bcrypt string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    Ok(bcrypt::verify(password, hash)?)
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt minimum
    const COST: u32 = 4;

    #[test]
    fn verifies_only_the_original_password() {
        let stored = hash_password("correct horse", COST).unwrap();
        assert!(stored.starts_with("$2"));
        assert!(verify_password("correct horse", &stored).unwrap());
        assert!(!verify_password("correct horse!", &stored).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same", COST).unwrap();
        let b = hash_password("same", COST).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same", &b).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }

    #[tokio::test]
    async fn blocking_variants_round_trip() {
        let stored = hash_password_blocking("s3cret-pass".into(), COST).await.unwrap();
        assert!(verify_password_blocking("s3cret-pass".into(), stored).await.unwrap());
    }
}

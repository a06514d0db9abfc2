use std::sync::LazyLock;

use anyhow::anyhow;
use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

/// Work factor for new hashes. `BCRYPT_COST` lowers it for test runs.
fn cost() -> u32 {
    std::env::var("BCRYPT_COST")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|c| (4..=31).contains(c))
        .unwrap_or(DEFAULT_COST)
}

// Verified against when the email is unknown so both paths cost a bcrypt round.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("lescracks-timing-equalizer", cost()).ok());

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, cost()).map_err(|e| AppError::internal(anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow!("Failed to verify password: {}", e)))
}

pub async fn hash_password_async(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal(anyhow!("Password hashing task failed: {}", e)))?
}

pub async fn verify_password_async(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::internal(anyhow!("Password verification task failed: {}", e)))?
}

/// Burns one bcrypt verification against a throwaway hash. Always yields `false`.
pub async fn verify_against_dummy(password: String) -> bool {
    let Some(dummy) = DUMMY_HASH.clone() else {
        return false;
    };
    let _ = verify_password_async(password, dummy).await;
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("correct horse").unwrap();
        assert_ne!(hashed, "correct horse");
        assert!(verify_password("correct horse", &hashed).unwrap());
        assert!(!verify_password("wrong horse", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }

    #[tokio::test]
    async fn test_async_variants() {
        let hashed = hash_password_async("secret123".to_string()).await.unwrap();
        assert!(
            verify_password_async("secret123".to_string(), hashed)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_dummy_never_matches() {
        assert!(!verify_against_dummy("lescracks-timing-equalizer".to_string()).await);
    }
}

//! Salted, slow password hashing.
//!
//! bcrypt work runs on the blocking pool so a burst of logins cannot stall
//! the async workers.

use thiserror::Error;
use tokio::task;

/// Hashed at startup and verified against when a login names an unknown
/// user, so that path costs the same as a wrong password.
const DUMMY_PASSWORD: &str = "turnstile-timing-equalizer";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("hashing task failed: {0}")]
    Join(#[from] task::JoinError),
}

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Fails when `cost` is outside the range bcrypt accepts.
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub async fn hash(&self, password: String) -> Result<String, PasswordError> {
        let cost = self.cost;
        Ok(task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
    }

    /// Verify `password` against `stored`. A missing hash always yields
    /// `false`, after doing the same amount of work as a real comparison.
    pub async fn verify(
        &self,
        password: String,
        stored: Option<String>,
    ) -> Result<bool, PasswordError> {
        let (hash, known) = match stored {
            Some(hash) => (hash, true),
            None => (self.dummy_hash.clone(), false),
        };

        let matched = task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        Ok(known && matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn test_hash_is_not_the_password() {
        let hasher = PasswordHasher::new(TEST_COST).unwrap();
        let hash = hasher.hash("pw123".into()).await.unwrap();
        assert_ne!(hash, "pw123");
        assert!(hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_verify_matches_only_the_right_password() {
        let hasher = PasswordHasher::new(TEST_COST).unwrap();
        let hash = hasher.hash("pw123".into()).await.unwrap();

        assert!(hasher.verify("pw123".into(), Some(hash.clone())).await.unwrap());
        assert!(!hasher.verify("wrong".into(), Some(hash.clone())).await.unwrap());
        assert!(!hasher.verify("".into(), Some(hash)).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_hashes_differently() {
        let hasher = PasswordHasher::new(TEST_COST).unwrap();
        let first = hasher.hash("pw123".into()).await.unwrap();
        let second = hasher.hash("pw123".into()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_missing_hash_never_matches() {
        let hasher = PasswordHasher::new(TEST_COST).unwrap();
        assert!(!hasher.verify(DUMMY_PASSWORD.into(), None).await.unwrap());
        assert!(!hasher.verify("anything".into(), None).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_hash_is_an_error() {
        let hasher = PasswordHasher::new(TEST_COST).unwrap();
        let result = hasher.verify("pw".into(), Some("not-a-bcrypt-hash".into())).await;
        assert!(matches!(result, Err(PasswordError::Bcrypt(_))));
    }

    #[test]
    fn test_invalid_cost_refused() {
        assert!(PasswordHasher::new(2).is_err());
        assert!(PasswordHasher::new(40).is_err());
    }
}

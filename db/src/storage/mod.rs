use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::DbUser;

pub mod memory;
pub mod mongodb;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query Error: {0}")]
    MongoDB(#[from] ::mongodb::error::Error),

    #[error("user {0} already exists")]
    Duplicate(String),

    #[error("store did not respond within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[async_trait]
pub trait Storage: UserStore + Send + Sync + 'static {
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore {
    /// Exact-match lookup on `username`.
    async fn find_by_username(&self, username: &str) -> Result<Option<DbUser>, StoreError>;

    /// Insert a new user. Fails with [`StoreError::Duplicate`] when the
    /// username is taken; an existing document is never replaced.
    async fn insert(&self, user: DbUser) -> Result<DbUser, StoreError>;
}

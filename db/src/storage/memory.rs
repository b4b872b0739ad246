use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::{
    models::DbUser,
    storage::{Storage, StoreError, UserStore},
};

/// In-process user store keyed by username.
///
/// Check-and-insert happens under one write lock, which gives the same
/// uniqueness guarantee as the unique index on the MongoDB collection.
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    users: Arc<RwLock<HashMap<String, DbUser>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn find_by_username(&self, username: &str) -> Result<Option<DbUser>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert(&self, mut user: DbUser) -> Result<DbUser, StoreError> {
        let mut users = self.users.write().await;
        match users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(user.username)),
            Entry::Vacant(slot) => {
                user.id = Some(ObjectId::new());
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, hash: &str) -> DbUser {
        DbUser::new(name.into(), hash.into(), 30, "f".into())
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = MemoryStorage::new();
        let created = store.insert(user("alice", "h1")).await.unwrap();
        assert!(created.id.is_some());

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert_eq!(found.password_hash, "h1");
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_find_is_exact_match() {
        let store = MemoryStorage::new();
        store.insert(user("alice", "h1")).await.unwrap();

        assert!(store.find_by_username("Alice").await.unwrap().is_none());
        assert!(store.find_by_username("alic").await.unwrap().is_none());
        assert!(store.find_by_username("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_never_overwrites() {
        let store = MemoryStorage::new();
        store.insert(user("alice", "original")).await.unwrap();

        let err = store.insert(user("alice", "replacement")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref name) if name == "alice"));

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "original");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_store_one_document() {
        let store = MemoryStorage::new();

        let attempts = (0..16).map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.insert(user("race", &format!("h{i}"))).await })
        });

        let results = futures::future::join_all(attempts).await;
        let successes = results
            .into_iter()
            .map(|joined| joined.unwrap())
            .filter(Result::is_ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(store.len().await, 1);
    }
}

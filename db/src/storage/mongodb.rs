use std::time::Duration;

use async_trait::async_trait;
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions},
};
use tracing::{debug, info};

use crate::{
    models::DbUser,
    storage::{Storage, StoreError, UserStore},
};

pub const MONGODB_COLLECTION_USERS: &str = "users";
pub const MONGODB_DEFAULT_DATABASE: &str = "turnstile";

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug)]
pub struct MongoDBStorage(Client);

impl MongoDBStorage {
    /// Connect and make sure the unique `username` index exists.
    ///
    /// `timeout` bounds server selection and connection establishment, so a
    /// store that is down fails requests instead of hanging them.
    pub async fn new(uri: &str, timeout: Duration) -> Result<Self, mongodb::error::Error> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some("turnstile".into());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let storage = Self(Client::with_options(options)?);
        storage.ensure_indexes().await?;

        info!(database = storage.get_db().name(), "Connected to MongoDB");
        Ok(storage)
    }

    async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        let created = self.users().create_index(index).await?;
        debug!(index = %created.index_name, "Ensured unique username index");
        Ok(())
    }

    fn get_db(&self) -> Database {
        self.0
            .default_database()
            .unwrap_or_else(|| self.0.database(MONGODB_DEFAULT_DATABASE))
    }

    fn users(&self) -> Collection<DbUser> {
        self.get_db().collection::<DbUser>(MONGODB_COLLECTION_USERS)
    }
}

fn is_duplicate_code(code: i32) -> bool {
    code == DUPLICATE_KEY_CODE
}

/// True when an insert was rejected by the unique `username` index.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            is_duplicate_code(write_error.code)
        }
        _ => false,
    }
}

#[async_trait]
impl UserStore for MongoDBStorage {
    async fn find_by_username(&self, username: &str) -> Result<Option<DbUser>, StoreError> {
        self.users()
            .find_one(doc! { "username": username })
            .await
            .map_err(StoreError::MongoDB)
    }

    async fn insert(&self, mut user: DbUser) -> Result<DbUser, StoreError> {
        let result = self.users().insert_one(&user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::Duplicate(user.username.clone())
            } else {
                StoreError::MongoDB(e)
            }
        })?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }
}

#[async_trait]
impl Storage for MongoDBStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        self.get_db().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mongodb::error::WriteError;

    use super::*;

    #[test]
    fn test_duplicate_key_code() {
        assert!(is_duplicate_code(11000));
        assert!(!is_duplicate_code(11001));
        assert!(!is_duplicate_code(0));
        assert!(!is_duplicate_code(121));
    }

    fn write_error(code: i32) -> mongodb::error::Error {
        let write_error: WriteError = mongodb::bson::from_document(doc! {
            "code": code,
            "errmsg": "E11000 duplicate key error collection: turnstile.users index: username_1",
        })
        .unwrap();
        ErrorKind::Write(WriteFailure::WriteError(write_error)).into()
    }

    #[test]
    fn test_unique_index_violation_is_duplicate() {
        assert!(is_duplicate_key(&write_error(DUPLICATE_KEY_CODE)));
        assert!(!is_duplicate_key(&write_error(121)));
    }

    #[test]
    fn test_non_write_errors_are_not_duplicates() {
        let err = mongodb::error::Error::custom("connection reset");
        assert!(!is_duplicate_key(&err));
    }
}

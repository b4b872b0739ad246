use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use serde::{Deserialize, Serialize};

/// A registered user as stored in the `users` collection.
///
/// Documents are written once at signup and never updated.
#[derive(Clone, Serialize, Deserialize)]
pub struct DbUser {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub password_hash: String,
    pub age: i64,
    pub gender: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl DbUser {
    pub fn new(username: String, password_hash: String, age: i64, gender: String) -> Self {
        Self {
            id: None,
            username,
            password_hash,
            age,
            gender,
            created_at: Utc::now(),
        }
    }
}

impl Display for DbUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DbUser {{ id: {:?}, username: {} }}",
            self.id, self.username
        )
    }
}

impl fmt::Debug for DbUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("age", &self.age)
            .field("gender", &self.gender)
            .field("created_at", &self.created_at)
            .finish()
    }
}

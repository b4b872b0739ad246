use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned by a successful signup.
pub const SIGNUP_SUCCESS_MESSAGE: &str = "User added successfully";

/// Identity asserted by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WhoAmI {
    pub username: String,

    /// When the presented token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

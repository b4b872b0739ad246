use thiserror::Error;
use turnstile_common::params::ValidationError;
use turnstile_db::storage::StoreError;

use super::{password::PasswordError, token::TokenError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("User {0} already exists")]
    DuplicateUser(String),

    /// Covers both an unknown username and a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(username) => Self::DuplicateUser(username),
            other => Self::StoreUnavailable(other),
        }
    }
}

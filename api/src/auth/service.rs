//! Signup and login orchestration.
//!
//! # Signup
//!
//! 1. Validate the payload (non-empty, alphanumeric username)
//! 2. Look the username up; an existing record is a [`AuthError::DuplicateUser`]
//! 3. Hash the password and insert the record
//!
//! The store's own uniqueness constraint rejects the second of two racing
//! inserts, so step 2 is only a fast path.
//!
//! # Login
//!
//! 1. Look the username up
//! 2. Verify the password against the stored hash
//! 3. Issue a token
//!
//! Unknown users and wrong passwords both end in
//! [`AuthError::InvalidCredentials`].

use std::{future::Future, sync::Arc, time::Duration};

use tracing::{info, instrument, warn};
use turnstile_common::params::{LoginParams, SignupParams};
use turnstile_db::{
    models::DbUser,
    storage::{Storage, StoreError},
};

use super::{
    error::AuthError,
    password::PasswordHasher,
    token::{Claims, IssuedToken, TokenIssuer},
};

pub struct AuthService {
    store: Arc<dyn Storage>,
    hasher: PasswordHasher,
    tokens: Arc<dyn TokenIssuer>,
    store_timeout: Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn Storage>,
        hasher: PasswordHasher,
        tokens: Arc<dyn TokenIssuer>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            store_timeout,
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.store_timeout))?
    }

    #[instrument(skip_all, fields(username = %params.username))]
    pub async fn signup(&self, params: SignupParams) -> Result<(), AuthError> {
        if let Err(e) = params.validate() {
            info!(reason = %e, "Empty password or username or invalid username");
            return Err(e.into());
        }

        if self
            .bounded(self.store.find_by_username(&params.username))
            .await?
            .is_some()
        {
            info!("User already exists, cannot create duplicate user");
            return Err(AuthError::DuplicateUser(params.username));
        }

        let SignupParams {
            username,
            password,
            age,
            gender,
        } = params;

        let password_hash = self.hasher.hash(password).await?;
        let user = self
            .bounded(self.store.insert(DbUser::new(username, password_hash, age, gender)))
            .await?;

        info!(id = ?user.id, "User added successfully");
        Ok(())
    }

    #[instrument(skip_all, fields(username = %params.username))]
    pub async fn login(&self, params: LoginParams) -> Result<IssuedToken, AuthError> {
        let stored_hash = self
            .bounded(self.store.find_by_username(&params.username))
            .await?
            .filter(|user| user.username == params.username)
            .map(|user| user.password_hash);

        if !self.hasher.verify(params.password, stored_hash).await? {
            info!("Invalid password or username");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.tokens.issue(&params.username)?;
        info!(expires_at = %issued.expires_at, "Issued token");
        Ok(issued)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens.verify(token).map_err(|e| {
            warn!(error = %e, "Rejected bearer token");
            AuthError::from(e)
        })
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.bounded(self.store.ping()).await
    }
}

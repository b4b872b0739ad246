use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use turnstile_db::storage::{Storage, memory::MemoryStorage, mongodb::MongoDBStorage};

use crate::{
    auth::{AuthService, JwtIssuer, PasswordHasher},
    config::{StoreKind, TurnstileConfig},
};

#[derive(Clone)]
pub struct ApiContext {
    pub auth: Arc<AuthService>,
}

impl ApiContext {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }

    /// Wire up the store, hasher and token issuer described by `config`.
    pub async fn from_config(config: &TurnstileConfig) -> anyhow::Result<Self> {
        let secret = config.signing_secret()?;
        let hasher = PasswordHasher::new(config.bcrypt_cost)
            .with_context(|| format!("invalid bcrypt cost {}", config.bcrypt_cost))?;

        let store: Arc<dyn Storage> = match config.store {
            StoreKind::Mongodb => Arc::new(
                MongoDBStorage::new(&config.mongodb_uri, config.store_timeout())
                    .await
                    .context("failed to connect to MongoDB")?,
            ),
            StoreKind::Memory => {
                info!("Using in-memory credential store, users are lost on exit");
                Arc::new(MemoryStorage::new())
            }
        };

        Ok(Self::new(AuthService::new(
            store,
            hasher,
            Arc::new(JwtIssuer::new(&secret)),
            config.store_timeout(),
        )))
    }
}

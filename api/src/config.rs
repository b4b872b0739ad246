use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::warn;

use crate::auth::token::SigningSecret;

/// Secrets shorter than this are accepted, but HS256 loses strength below
/// the digest size.
const RECOMMENDED_SECRET_LEN: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// MongoDB at `--mongodb-uri`.
    Mongodb,
    /// Process-local store. Everything is lost on exit.
    Memory,
}

#[derive(Clone, Parser)]
#[command(version, about = "Signup and login gateway")]
pub struct TurnstileConfig {
    #[clap(
        short,
        long,
        env = "TURNSTILE_BIND_ADDR",
        default_value = "0.0.0.0:8080"
    )]
    pub bind_addr: SocketAddr,

    #[clap(long, default_value_t = false)]
    pub dump_openapi: bool,

    #[clap(long, env = "TURNSTILE_STORE", value_enum, default_value_t = StoreKind::Mongodb)]
    pub store: StoreKind,

    #[clap(
        long,
        env = "TURNSTILE_MONGODB_URI",
        default_value = "mongodb://localhost:27017/turnstile"
    )]
    pub mongodb_uri: String,

    /// Upper bound for every credential store call, in milliseconds.
    #[clap(long, env = "TURNSTILE_STORE_TIMEOUT_MS", default_value_t = 5000)]
    pub store_timeout_ms: u64,

    /// HMAC secret used to sign issued tokens.
    ///
    /// Mutually exclusive with `signing_secret_file`; prefer the file form so
    /// the secret does not show up in process listings.
    #[clap(long, env = "TURNSTILE_SIGNING_SECRET", hide_env_values = true)]
    pub signing_secret: Option<String>,

    /// Path to a file holding the HMAC signing secret. A trailing newline is
    /// ignored.
    #[clap(long, env = "TURNSTILE_SIGNING_SECRET_FILE")]
    pub signing_secret_file: Option<PathBuf>,

    /// bcrypt work factor for stored password hashes (4 to 31).
    #[clap(long, env = "TURNSTILE_BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,
}

impl TurnstileConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Load the signing secret from either inline config or file.
    ///
    /// Checks `signing_secret` first, then falls back to reading
    /// `signing_secret_file`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Neither `signing_secret` nor `signing_secret_file` is configured
    /// - `signing_secret_file` can't be read
    /// - The resulting secret is empty
    pub fn signing_secret(&self) -> anyhow::Result<SigningSecret> {
        let raw = if let Some(ref secret) = self.signing_secret {
            secret.clone()
        } else if let Some(ref path) = self.signing_secret_file {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read signing secret file {}", path.display()))?
                .trim_end_matches(['\r', '\n'])
                .to_string()
        } else {
            anyhow::bail!(
                "no signing secret configured (set TURNSTILE_SIGNING_SECRET or TURNSTILE_SIGNING_SECRET_FILE)"
            );
        };

        if !raw.is_empty() && raw.len() < RECOMMENDED_SECRET_LEN {
            warn!(
                len = raw.len(),
                "Signing secret is shorter than {RECOMMENDED_SECRET_LEN} bytes, consider a longer one"
            );
        }

        Ok(SigningSecret::new(raw.into_bytes())?)
    }
}

//! Turnstile API service.
//!
//! A two-endpoint credential gateway: `POST /signup` registers a user in the
//! credential store and `POST /login` exchanges a username and password for
//! a signed, 24-hour JWT.
//!
//! # Configuration
//!
//! The service requires an HMAC signing secret for the tokens it issues. See
//! [`config::TurnstileConfig`] for configuration options.
//!
//! # Authentication
//!
//! Passwords are stored as bcrypt hashes, see [`auth::password`]. The
//! signup/login flow lives in [`auth::service::AuthService`].

pub mod auth;
pub mod config;
pub mod context;
pub mod server;

pub(crate) mod error;
pub(crate) mod handlers;

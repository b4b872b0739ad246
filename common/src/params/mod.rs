//! Input parameters for the various functions within Turnstile.

mod auth;
pub use auth::*;

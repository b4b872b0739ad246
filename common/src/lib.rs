//! Wire types shared by the Turnstile crates.
//!
//! [`params`] holds request bodies and the input rules they must satisfy,
//! [`views`] holds everything the API writes back to clients.

pub mod params;
pub mod views;

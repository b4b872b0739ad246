//! Credential store for Turnstile.
//!
//! User documents live in a MongoDB collection with a unique index on
//! `username`. [`storage::memory::MemoryStorage`] implements the same
//! contract in process for tests and local runs.

pub mod models;
pub mod storage;

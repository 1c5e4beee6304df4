//! Infrastructure layer for Zeny.
//!
//! Contains implementations of the traits defined in `zeny-core`: SQLite
//! repositories, the Argon2id credential hasher, the HMAC-SHA256 token
//! service, and the settings file loader.

pub mod config;
pub mod crypto;
pub mod sqlite;

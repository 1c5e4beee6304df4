//! Cryptographic operations for Zeny.
//!
//! - `password`: Argon2id password hashing (PHC strings)
//! - `token`: HMAC-SHA256 signed bearer tokens

pub mod password;
pub mod token;

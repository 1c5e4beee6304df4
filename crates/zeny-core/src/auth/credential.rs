//! CredentialHasher trait for one-way password hashing.
//!
//! Defined in zeny-core so the identity service can hash and verify
//! passwords without coupling to a specific algorithm. The Argon2id adapter
//! lives in zeny-infra.

use thiserror::Error;

/// Hashing failed (e.g. RNG or parameter error). Never carries the password.
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(pub String);

/// Abstraction over a salted, computationally expensive password hash.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into an opaque, self-describing string.
    fn hash_password(
        &self,
        password: &str,
    ) -> impl std::future::Future<Output = Result<String, HashError>> + Send;

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed stored hash yields `false`, exactly like a wrong password.
    fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> impl std::future::Future<Output = bool> + Send;
}

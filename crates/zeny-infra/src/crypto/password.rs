//! Argon2id password hashing.
//!
//! Implements the `CredentialHasher` trait from `zeny-core`. Hashes are PHC
//! strings (`$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`) carrying their own
//! salt and cost parameters, so verification needs nothing but the string.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use zeny_core::auth::credential::{CredentialHasher, HashError};

/// Argon2id memory cost in KiB (19 MiB).
const MEMORY_COST_KIB: u32 = 19_456;
/// Argon2id iterations.
const TIME_COST: u32 = 2;
/// Argon2id lanes.
const PARALLELISM: u32 = 1;

fn argon2() -> Result<Argon2<'static>, HashError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| HashError(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Argon2id implementation of `CredentialHasher`.
///
/// Hashing is CPU- and memory-bound, so both operations run on tokio's
/// blocking pool instead of stalling a runtime worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2CredentialHasher;

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    async fn hash_password(&self, password: &str) -> Result<String, HashError> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || -> Result<String, HashError> {
            let salt = SaltString::generate(&mut OsRng);
            let hash = argon2()?
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| HashError(e.to_string()))?;
            Ok(hash.to_string())
        })
        .await
        .map_err(|e| HashError(e.to_string()))?
    }

    async fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();
        tokio::task::spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&stored_hash) else {
                tracing::warn!("Stored password hash is not a valid PHC string");
                return false;
            };
            match argon2() {
                Ok(argon2) => argon2.verify_password(password.as_bytes(), &parsed).is_ok(),
                Err(_) => false,
            }
        })
        .await
        .unwrap_or(false)
    }
}

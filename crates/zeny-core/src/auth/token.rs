//! TokenService trait for stateless bearer tokens.

use chrono::{DateTime, Utc};
use zeny_types::error::AuthError;
use zeny_types::user::TokenClaims;

/// Token type reported to clients alongside every issued token.
pub const TOKEN_TYPE: &str = "bearer";

/// Issues and validates signed, time-bounded tokens binding a subject.
///
/// Tokens are not persisted. Rotating the signing secret invalidates every
/// token issued before the rotation.
pub trait TokenService: Send + Sync {
    /// Issue a token for `subject`, valid from `now` until `now + ttl`.
    fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AuthError>;

    /// Validate a token at instant `now`.
    ///
    /// Returns `AuthError::Malformed` when the token cannot be parsed or its
    /// signature does not verify, and `AuthError::Expired` when the signature
    /// is valid but `now` is at or past the expiry.
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError>;
}

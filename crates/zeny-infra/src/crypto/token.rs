//! HMAC-SHA256 bearer tokens.
//!
//! Tokens use the compact JWS layout so standard JWT tooling can decode them:
//! `base64url(header).base64url(claims).base64url(signature)`, where the
//! header is fixed to `{"alg":"HS256","typ":"JWT"}` and the signature is
//! HMAC-SHA256 over the first two segments.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use zeny_core::auth::token::TokenService;
use zeny_types::error::AuthError;
use zeny_types::user::TokenClaims;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Stateless token service keyed by a process-wide signing secret.
pub struct HmacTokenService {
    key: SecretSlice<u8>,
    ttl: Duration,
}

impl HmacTokenService {
    /// Create a token service signing with `secret`; tokens live for `ttl`.
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        Self {
            key: SecretSlice::from(secret.expose_secret().as_bytes().to_vec()),
            ttl,
        }
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(self.key.expose_secret())
            .map_err(|e| AuthError::Unavailable(format!("invalid signing key: {e}")))
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| AuthError::Unavailable(format!("token encoding failed: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

fn decode_json<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::Malformed)
}

impl TokenService for HmacTokenService {
    fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Unavailable("token expiry out of range".to_string()))?;

        let header = encode_json(&Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        })?;
        let claims = encode_json(&TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })?;

        let signing_input = format!("{header}.{claims}");
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }

    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let mut segments = token.split('.');
        let (Some(header), Some(claims), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AuthError::Malformed);
        };

        let parsed_header: Header = decode_json(header)?;
        if parsed_header.alg != ALGORITHM {
            return Err(AuthError::Malformed);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(claims.as_bytes());
        // Constant-time verification (via hmac crate's `verify_slice`)
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::Malformed)?;

        let claims: TokenClaims = decode_json(claims)?;
        if !claims.is_valid_at(now) {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}

//! Authentication ports and the identity service.
//!
//! - `credential`: password hashing abstraction (Credential Store)
//! - `token`: bearer token issuing/validation abstraction (Token Service)
//! - `identity`: registration, login, token resolution and role checks

pub mod credential;
pub mod identity;
pub mod token;

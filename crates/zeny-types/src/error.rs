use thiserror::Error;

/// Errors from the authentication and identity layer.
///
/// `Malformed`, `Expired`, `UserNotFound` and `InvalidCredentials` are kept
/// apart for logging, but callers must treat them as one condition; see
/// [`AuthError::is_authentication_failure`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token is malformed or its signature does not verify")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token subject does not exist")]
    UserNotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("permission denied")]
    PermissionDenied,

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

impl AuthError {
    /// True for every failure that must surface as a generic 401.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AuthError::Malformed
                | AuthError::Expired
                | AuthError::UserNotFound
                | AuthError::InvalidCredentials
        )
    }
}

/// Errors related to avatar persona operations.
#[derive(Debug, Error)]
pub enum AvatarError {
    /// Absent, soft-deleted, or owned by someone else. Deliberately indistinguishable.
    #[error("avatar not found")]
    NotFound,

    #[error("invalid avatar field: {0}")]
    InvalidField(String),

    #[error("avatar store unavailable: {0}")]
    Unavailable(String),
}

/// Errors related to conversation lifecycle operations.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("conversation not found")]
    NotFound,

    #[error("avatar not found")]
    AvatarNotFound,

    #[error("reply generation failed: {0}")]
    Reply(String),

    #[error("conversation store unavailable: {0}")]
    Unavailable(String),
}

/// Errors related to summary generation and lookup.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("summary not found")]
    NotFound,

    #[error("conversation not found")]
    ConversationNotFound,

    #[error("avatar not found")]
    AvatarNotFound,

    #[error("summary store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from repository operations (used by trait definitions in zeny-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors raised while assembling the service configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

//! Application error type mapping domain errors to HTTP status codes.
//!
//! Error bodies use the envelope:
//! `{"data": null, "meta": {"timestamp": ...}, "errors": [{"code", "message"}]}`.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use zeny_types::error::{AuthError, AvatarError, ConversationError, SummaryError};

/// Message shared by every authentication failure so callers cannot tell
/// a bad password from an unknown user or an expired token.
pub const AUTH_FAILED_MESSAGE: &str = "Could not validate credentials";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Identity and authentication errors.
    Auth(AuthError),
    /// Avatar persona errors.
    Avatar(AvatarError),
    /// Conversation errors.
    Conversation(ConversationError),
    /// Summary errors.
    Summary(SummaryError),
    /// Missing or unreadable bearer credentials.
    Unauthorized,
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<AvatarError> for AppError {
    fn from(e: AvatarError) -> Self {
        AppError::Avatar(e)
    }
}

impl From<ConversationError> for AppError {
    fn from(e: ConversationError) -> Self {
        AppError::Conversation(e)
    }
}

impl From<SummaryError> for AppError {
    fn from(e: SummaryError) -> Self {
        AppError::Summary(e)
    }
}

fn unavailable(detail: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %detail, "Store unavailable");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        "SERVICE_UNAVAILABLE",
        "Service temporarily unavailable".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                AUTH_FAILED_MESSAGE.to_string(),
            ),
            AppError::Auth(e) if e.is_authentication_failure() => {
                tracing::debug!(reason = %e, "Authentication failed");
                (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    AUTH_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::Auth(AuthError::PermissionDenied) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Admin privileges required".to_string(),
            ),
            AppError::Auth(AuthError::UsernameTaken(name)) => (
                StatusCode::CONFLICT,
                "USERNAME_TAKEN",
                format!("Username '{name}' is already registered"),
            ),
            AppError::Auth(AuthError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Auth(e) => unavailable(&e.to_string()),
            AppError::Avatar(AvatarError::NotFound) => (
                StatusCode::NOT_FOUND,
                "AVATAR_NOT_FOUND",
                "Avatar not found".to_string(),
            ),
            AppError::Avatar(AvatarError::InvalidField(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Avatar(AvatarError::Unavailable(detail)) => unavailable(detail),
            AppError::Conversation(ConversationError::NotFound) => (
                StatusCode::NOT_FOUND,
                "CONVERSATION_NOT_FOUND",
                "Conversation not found".to_string(),
            ),
            AppError::Conversation(ConversationError::AvatarNotFound) => (
                StatusCode::NOT_FOUND,
                "AVATAR_NOT_FOUND",
                "Avatar not found".to_string(),
            ),
            AppError::Conversation(ConversationError::Reply(detail)) => {
                tracing::error!(error = %detail, "Reply generation failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "REPLY_FAILED",
                    "Avatar reply could not be generated".to_string(),
                )
            }
            AppError::Conversation(ConversationError::Unavailable(detail)) => unavailable(detail),
            AppError::Summary(SummaryError::NotFound) => (
                StatusCode::NOT_FOUND,
                "SUMMARY_NOT_FOUND",
                "Summary not found".to_string(),
            ),
            AppError::Summary(SummaryError::ConversationNotFound) => (
                StatusCode::NOT_FOUND,
                "CONVERSATION_NOT_FOUND",
                "Conversation not found".to_string(),
            ),
            AppError::Summary(SummaryError::AvatarNotFound) => (
                StatusCode::NOT_FOUND,
                "AVATAR_NOT_FOUND",
                "Avatar not found".to_string(),
            ),
            AppError::Summary(SummaryError::Unavailable(detail)) => unavailable(detail),
        };

        let body = json!({
            "data": null,
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        let mut response = (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

//! Bearer token authentication extractors.
//!
//! `CurrentUser` resolves `Authorization: Bearer <token>` to a user record.
//! `AdminUser` additionally requires the admin flag (403 otherwise, distinct
//! from the 401 of a failed authentication).

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use zeny_types::user::User;

use crate::http::error::AppError;
use crate::state::{AppState, ConcreteIdentityService};

/// The authenticated caller.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;
        let user = state.identity.resolve(token).await?;
        Ok(CurrentUser(user))
    }
}

/// The authenticated caller, known to be an admin.
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        let admin = ConcreteIdentityService::require_admin(user)?;
        Ok(AdminUser(admin))
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
fn extract_bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let (scheme, token) = header.split_once(' ').ok_or(AppError::Unauthorized)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(token)
}

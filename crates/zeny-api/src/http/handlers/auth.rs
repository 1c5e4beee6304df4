//! Registration, login and identity handlers.

use axum::Json;
use axum::extract::State;

use zeny_types::user::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateAdminCredentialsRequest, User,
};

use crate::http::error::AppError;
use crate::http::extractors::auth::{AdminUser, CurrentUser};
use crate::http::handlers::MessageResponse;
use crate::state::AppState;

/// POST /api/auth/login - Exchange username and password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = state.identity.login(body).await?;
    Ok(Json(response))
}

/// POST /api/auth/register - Create a standard account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<User>, AppError> {
    let user = state.identity.register(body).await?;
    Ok(Json(user))
}

/// GET /api/auth/me - The authenticated caller.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// PUT /api/auth/admin/credentials - Rotate the admin's username and password.
pub async fn update_admin_credentials(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(body): Json<UpdateAdminCredentialsRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.identity.update_admin_credentials(&admin, body).await?;
    Ok(Json(MessageResponse::new(
        "Admin credentials updated successfully",
    )))
}

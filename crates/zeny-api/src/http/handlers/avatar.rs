//! Avatar persona handlers. Every route is scoped to the caller's avatars.

use axum::Json;
use axum::extract::{Path, State};

use zeny_types::avatar::{Avatar, AvatarId, CreateAvatarRequest, UpdateAvatarRequest};
use zeny_types::summary::Summary;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::handlers::MessageResponse;
use crate::state::AppState;

/// POST /api/avatars - Create an avatar owned by the caller.
pub async fn create_avatar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateAvatarRequest>,
) -> Result<Json<Avatar>, AppError> {
    let avatar = state.avatars.create(&user.id, body).await?;
    Ok(Json(avatar))
}

/// GET /api/avatars - The caller's active avatars.
pub async fn list_avatars(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Avatar>>, AppError> {
    let avatars = state.avatars.list(&user.id).await?;
    Ok(Json(avatars))
}

/// GET /api/avatars/{id}
pub async fn get_avatar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<AvatarId>,
) -> Result<Json<Avatar>, AppError> {
    let avatar = state.avatars.get(&id, &user.id).await?;
    Ok(Json(avatar))
}

/// PUT /api/avatars/{id} - Apply a partial update.
pub async fn update_avatar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<AvatarId>,
    Json(body): Json<UpdateAvatarRequest>,
) -> Result<Json<Avatar>, AppError> {
    let avatar = state.avatars.update(&id, &user.id, body).await?;
    Ok(Json(avatar))
}

/// DELETE /api/avatars/{id} - Soft delete.
pub async fn delete_avatar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<AvatarId>,
) -> Result<Json<MessageResponse>, AppError> {
    state.avatars.soft_delete(&id, &user.id).await?;
    Ok(Json(MessageResponse::new("Avatar deleted successfully")))
}

/// GET /api/avatars/{id}/summaries - Newest first.
pub async fn list_avatar_summaries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<AvatarId>,
) -> Result<Json<Vec<Summary>>, AppError> {
    let summaries = state.summaries.list_for_avatar(&id, &user.id).await?;
    Ok(Json(summaries))
}

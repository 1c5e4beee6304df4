//! Summary handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use zeny_types::conversation::ConversationId;
use zeny_types::summary::{Summary, SummaryId};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::query::AvatarFilterQuery;
use crate::state::AppState;

/// POST /api/conversations/{id}/summary - Generate once, then return the stored summary.
pub async fn generate_summary(
    State(state): State<AppState>,
    Path(id): Path<ConversationId>,
) -> Result<Json<Summary>, AppError> {
    let summary = state.summaries.generate(&id).await?;
    Ok(Json(summary))
}

/// GET /api/summaries?avatar_id= - Summaries of the caller's active avatars, newest first.
pub async fn list_summaries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<AvatarFilterQuery>,
) -> Result<Json<Vec<Summary>>, AppError> {
    let summaries = match query.avatar_id {
        Some(avatar_id) => state.summaries.list_for_avatar(&avatar_id, &user.id).await?,
        None => state.summaries.list_for_owner(&user.id).await?,
    };
    Ok(Json(summaries))
}

/// GET /api/summaries/{id}
pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<SummaryId>,
) -> Result<Json<Summary>, AppError> {
    let summary = state.summaries.get(&id).await?;
    Ok(Json(summary))
}

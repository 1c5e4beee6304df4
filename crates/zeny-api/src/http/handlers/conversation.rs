//! Conversation handlers. These routes are unauthenticated.

use axum::Json;
use axum::extract::{Path, Query, State};

use zeny_types::conversation::{
    AppendMessageRequest, Conversation, ConversationId, StartConversationRequest,
};

use crate::http::error::AppError;
use crate::http::extractors::query::AvatarFilterQuery;
use crate::http::handlers::MessageResponse;
use crate::state::AppState;

/// POST /api/conversations - Start a conversation with an active avatar.
pub async fn start_conversation(
    State(state): State<AppState>,
    Json(body): Json<StartConversationRequest>,
) -> Result<Json<Conversation>, AppError> {
    let conversation = state.conversations.start(body).await?;
    Ok(Json(conversation))
}

/// GET /api/conversations?avatar_id= - Oldest first.
pub async fn list_conversations(
    State(state): State<AppState>,
    Query(query): Query<AvatarFilterQuery>,
) -> Result<Json<Vec<Conversation>>, AppError> {
    let conversations = state.conversations.list(query.avatar_id.as_ref()).await?;
    Ok(Json(conversations))
}

/// GET /api/conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<ConversationId>,
) -> Result<Json<Conversation>, AppError> {
    let conversation = state.conversations.get(&id).await?;
    Ok(Json(conversation))
}

/// POST /api/conversations/{id}/messages - Append a message (and the reply).
pub async fn append_message(
    State(state): State<AppState>,
    Path(id): Path<ConversationId>,
    Json(body): Json<AppendMessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.conversations.append_message(&id, body).await?;
    Ok(Json(MessageResponse::new("Message added successfully")))
}

/// PUT /api/conversations/{id}/end
pub async fn end_conversation(
    State(state): State<AppState>,
    Path(id): Path<ConversationId>,
) -> Result<Json<MessageResponse>, AppError> {
    state.conversations.end(&id).await?;
    Ok(Json(MessageResponse::new("Conversation ended successfully")))
}

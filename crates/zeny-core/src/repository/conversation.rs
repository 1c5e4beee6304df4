//! Conversation repository trait definition.

use chrono::{DateTime, Utc};
use zeny_types::avatar::AvatarId;
use zeny_types::conversation::{Conversation, ConversationId, Message};
use zeny_types::error::RepositoryError;

/// Repository trait for conversations and their embedded message log.
///
/// The message log is append-only: there is no operation to edit or remove
/// a message.
pub trait ConversationRepository: Send + Sync {
    /// Insert a new conversation (with an empty message log).
    fn create(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation with all its messages in insertion order.
    fn get(
        &self,
        id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List conversations, optionally restricted to one avatar, oldest first.
    fn list(
        &self,
        avatar_id: Option<&AvatarId>,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Append a message to the end of the log.
    ///
    /// Returns `false` if the conversation does not exist.
    fn append_message(
        &self,
        id: &ConversationId,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Set status to ended and stamp `ended_at`.
    ///
    /// Returns `false` if the conversation does not exist.
    fn mark_ended(
        &self,
        id: &ConversationId,
        ended_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}

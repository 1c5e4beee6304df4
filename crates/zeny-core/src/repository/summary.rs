//! Summary repository trait definition.

use zeny_types::avatar::AvatarId;
use zeny_types::conversation::ConversationId;
use zeny_types::error::RepositoryError;
use zeny_types::summary::{Summary, SummaryId};
use zeny_types::user::UserId;

/// Repository trait for summary persistence.
pub trait SummaryRepository: Send + Sync {
    /// Store `summary` unless one already exists for its conversation.
    ///
    /// Must be atomic with respect to concurrent callers: exactly one summary
    /// per conversation survives, and every caller gets that surviving row back.
    fn insert_if_absent(
        &self,
        summary: &Summary,
    ) -> impl std::future::Future<Output = Result<Summary, RepositoryError>> + Send;

    /// Get a summary by its ID.
    fn get(
        &self,
        id: &SummaryId,
    ) -> impl std::future::Future<Output = Result<Option<Summary>, RepositoryError>> + Send;

    /// Get the summary of a conversation, if generated.
    fn get_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<Option<Summary>, RepositoryError>> + Send;

    /// Summaries for one avatar, most recently generated first.
    fn list_for_avatar(
        &self,
        avatar_id: &AvatarId,
    ) -> impl std::future::Future<Output = Result<Vec<Summary>, RepositoryError>> + Send;

    /// Summaries for every active avatar owned by `owner`, most recent first.
    fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Summary>, RepositoryError>> + Send;
}

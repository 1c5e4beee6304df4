//! Summary generator.
//!
//! Derives at most one summary per conversation. Generation is idempotent:
//! once a summary exists it is returned unchanged, and concurrent generators
//! converge on the single row the store keeps.

use chrono::Utc;
use tracing::{debug, info};
use zeny_types::avatar::AvatarId;
use zeny_types::conversation::{Conversation, ConversationId};
use zeny_types::error::{RepositoryError, SummaryError};
use zeny_types::summary::{Summary, SummaryId};
use zeny_types::user::UserId;

use crate::repository::avatar::{AvatarRepository, Visibility};
use crate::repository::conversation::ConversationRepository;
use crate::repository::summary::SummaryRepository;
use crate::text::prefix;

/// Characters of the first/last message quoted in the key points.
const QUOTED_CHARS: usize = 50;

fn unavailable(e: RepositoryError) -> SummaryError {
    SummaryError::Unavailable(e.to_string())
}

/// Build the summary text and key points for a conversation.
pub fn compose_summary(conversation: &Conversation) -> (String, Vec<String>) {
    let total = conversation.messages.len();
    let from_avatar = conversation
        .messages
        .iter()
        .filter(|m| m.is_from_avatar())
        .count();
    let from_participant = total - from_avatar;

    let summary_text = format!(
        "Conversation between avatar and {} with {total} total messages. \
         Participant sent {from_participant} messages, avatar responded {from_avatar} times.",
        conversation.participant_name,
    );

    let mut key_points = vec![
        format!("Conversation started at {}", conversation.started_at.to_rfc3339()),
        format!("Total messages exchanged: {total}"),
        format!("Participant: {}", conversation.participant_name),
        format!("Avatar ID: {}", conversation.avatar_id),
    ];

    if let (Some(first), Some(last)) = (conversation.messages.first(), conversation.messages.last())
    {
        key_points.push(format!(
            "First message: {}...",
            prefix(&first.content, QUOTED_CHARS)
        ));
        key_points.push(format!(
            "Last message: {}...",
            prefix(&last.content, QUOTED_CHARS)
        ));
    }

    (summary_text, key_points)
}

/// Service generating and listing conversation summaries.
pub struct SummaryService<S, C, A>
where
    S: SummaryRepository,
    C: ConversationRepository,
    A: AvatarRepository,
{
    summaries: S,
    conversations: C,
    avatars: A,
}

impl<S, C, A> SummaryService<S, C, A>
where
    S: SummaryRepository,
    C: ConversationRepository,
    A: AvatarRepository,
{
    pub fn new(summaries: S, conversations: C, avatars: A) -> Self {
        Self {
            summaries,
            conversations,
            avatars,
        }
    }

    /// Return the conversation's summary, generating it on first request.
    pub async fn generate(&self, conversation_id: &ConversationId) -> Result<Summary, SummaryError> {
        if let Some(existing) = self
            .summaries
            .get_by_conversation(conversation_id)
            .await
            .map_err(unavailable)?
        {
            debug!(conversation_id = %conversation_id, "Summary already exists");
            return Ok(existing);
        }

        let conversation = self
            .conversations
            .get(conversation_id)
            .await
            .map_err(unavailable)?
            .ok_or(SummaryError::ConversationNotFound)?;

        let (summary_text, key_points) = compose_summary(&conversation);
        let candidate = Summary {
            id: SummaryId::new(),
            avatar_id: conversation.avatar_id,
            conversation_id: conversation.id,
            summary_text,
            key_points,
            generated_at: Utc::now(),
        };

        let stored = self
            .summaries
            .insert_if_absent(&candidate)
            .await
            .map_err(unavailable)?;
        if stored.id == candidate.id {
            info!(summary_id = %stored.id, conversation_id = %conversation_id, "Summary generated");
        }
        Ok(stored)
    }

    pub async fn get(&self, id: &SummaryId) -> Result<Summary, SummaryError> {
        self.summaries
            .get(id)
            .await
            .map_err(unavailable)?
            .ok_or(SummaryError::NotFound)
    }

    /// Summaries of one avatar owned by `requester`, newest first.
    pub async fn list_for_avatar(
        &self,
        avatar_id: &AvatarId,
        requester: &UserId,
    ) -> Result<Vec<Summary>, SummaryError> {
        self.avatars
            .find(avatar_id, Visibility::Owner(*requester))
            .await
            .map_err(unavailable)?
            .ok_or(SummaryError::AvatarNotFound)?;

        self.summaries
            .list_for_avatar(avatar_id)
            .await
            .map_err(unavailable)
    }

    /// Summaries across all of `requester`'s active avatars, newest first.
    pub async fn list_for_owner(&self, requester: &UserId) -> Result<Vec<Summary>, SummaryError> {
        self.summaries
            .list_for_owner(requester)
            .await
            .map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryAvatars, MemoryConversations, MemorySummaries, sample_avatar};
    use zeny_types::conversation::{ConversationStatus, Message};

    struct Fixture {
        svc: SummaryService<MemorySummaries, MemoryConversations, MemoryAvatars>,
        conversations: MemoryConversations,
        avatars: MemoryAvatars,
    }

    fn fixture() -> Fixture {
        let conversations = MemoryConversations::default();
        let avatars = MemoryAvatars::default();
        let svc = SummaryService::new(
            MemorySummaries::new(avatars.clone()),
            conversations.clone(),
            avatars.clone(),
        );
        Fixture {
            svc,
            conversations,
            avatars,
        }
    }

    fn conversation(avatar_id: AvatarId, messages: Vec<Message>) -> Conversation {
        Conversation {
            id: ConversationId::new(),
            avatar_id,
            participant_name: "maria".to_string(),
            messages,
            started_at: Utc::now(),
            ended_at: None,
            status: ConversationStatus::Active,
        }
    }

    #[test]
    fn test_compose_zero_messages() {
        let conv = conversation(AvatarId::new(), Vec::new());
        let (text, points) = compose_summary(&conv);
        assert_eq!(
            text,
            "Conversation between avatar and maria with 0 total messages. \
             Participant sent 0 messages, avatar responded 0 times."
        );
        assert_eq!(points.len(), 4);
        assert!(points[0].starts_with("Conversation started at "));
        assert_eq!(points[1], "Total messages exchanged: 0");
        assert_eq!(points[2], "Participant: maria");
        assert_eq!(points[3], format!("Avatar ID: {}", conv.avatar_id));
    }

    #[test]
    fn test_compose_counts_and_quotes() {
        let long = "z".repeat(70);
        let conv = conversation(
            AvatarId::new(),
            vec![
                Message::now("maria", "hello"),
                Message::now("avatar", "hi maria"),
                Message::now("maria", long.clone()),
            ],
        );
        let (text, points) = compose_summary(&conv);
        assert!(text.contains("with 3 total messages"));
        assert!(text.contains("Participant sent 2 messages, avatar responded 1 times."));
        assert_eq!(points.len(), 6);
        assert_eq!(points[4], "First message: hello...");
        assert_eq!(points[5], format!("Last message: {}...", "z".repeat(50)));
    }

    #[tokio::test]
    async fn test_generate_is_idempotent() {
        let f = fixture();
        let avatar = f.avatars.insert(sample_avatar(UserId::new(), "Nova"));
        let conv = f
            .conversations
            .insert(conversation(avatar.id, vec![Message::now("maria", "hi")]));

        let first = f.svc.generate(&conv.id).await.unwrap();
        f.conversations
            .push_message(&conv.id, Message::now("maria", "later"));
        let second = f.svc.generate(&conv.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(f.svc.get(&first.id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_generate_unknown_conversation() {
        let f = fixture();
        let err = f.svc.generate(&ConversationId::new()).await.unwrap_err();
        assert!(matches!(err, SummaryError::ConversationNotFound));
    }

    #[tokio::test]
    async fn test_get_unknown_summary() {
        let f = fixture();
        let err = f.svc.get(&SummaryId::new()).await.unwrap_err();
        assert!(matches!(err, SummaryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_for_avatar_scoped_to_owner() {
        let f = fixture();
        let owner = UserId::new();
        let stranger = UserId::new();
        let avatar = f.avatars.insert(sample_avatar(owner, "Nova"));
        let c1 = f.conversations.insert(conversation(avatar.id, Vec::new()));
        let c2 = f.conversations.insert(conversation(avatar.id, Vec::new()));
        let s1 = f.svc.generate(&c1.id).await.unwrap();
        let s2 = f.svc.generate(&c2.id).await.unwrap();

        let listed = f.svc.list_for_avatar(&avatar.id, &owner).await.unwrap();
        assert_eq!(listed.iter().map(|s| s.id).collect::<Vec<_>>(), vec![s2.id, s1.id]);

        let err = f
            .svc
            .list_for_avatar(&avatar.id, &stranger)
            .await
            .unwrap_err();
        assert!(matches!(err, SummaryError::AvatarNotFound));

        f.avatars.set_active(&avatar.id, false);
        let err = f.svc.list_for_avatar(&avatar.id, &owner).await.unwrap_err();
        assert!(matches!(err, SummaryError::AvatarNotFound));
    }

    #[tokio::test]
    async fn test_list_for_owner_excludes_other_owners_and_inactive() {
        let f = fixture();
        let owner = UserId::new();
        let mine = f.avatars.insert(sample_avatar(owner, "Mine"));
        let retired = f.avatars.insert(sample_avatar(owner, "Retired"));
        let theirs = f.avatars.insert(sample_avatar(UserId::new(), "Theirs"));

        let keep = f.conversations.insert(conversation(mine.id, Vec::new()));
        let hidden = f.conversations.insert(conversation(retired.id, Vec::new()));
        let foreign = f.conversations.insert(conversation(theirs.id, Vec::new()));
        let expected = f.svc.generate(&keep.id).await.unwrap();
        f.svc.generate(&hidden.id).await.unwrap();
        f.svc.generate(&foreign.id).await.unwrap();
        f.avatars.set_active(&retired.id, false);

        let listed = f.svc.list_for_owner(&owner).await.unwrap();
        assert_eq!(listed, vec![expected]);
    }
}

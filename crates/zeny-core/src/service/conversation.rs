//! Conversation engine.
//!
//! Lifecycle `active -> ended`, append-only message log, and the reply
//! trigger: every stored message whose sender is not the avatar prompts one
//! generated reply from the conversation's avatar. Replies never trigger
//! further replies.

use chrono::Utc;
use tracing::{debug, info, warn};
use zeny_types::avatar::AvatarId;
use zeny_types::conversation::{
    AVATAR_SENDER, AppendMessageRequest, Conversation, ConversationId, ConversationStatus,
    Message, StartConversationRequest,
};
use zeny_types::error::{ConversationError, RepositoryError};

use crate::reply::ReplyGenerator;
use crate::repository::avatar::{AvatarRepository, Visibility};
use crate::repository::conversation::ConversationRepository;

fn unavailable(e: RepositoryError) -> ConversationError {
    ConversationError::Unavailable(e.to_string())
}

/// Service driving conversation lifecycle and reply generation.
pub struct ConversationService<C, A, R>
where
    C: ConversationRepository,
    A: AvatarRepository,
    R: ReplyGenerator,
{
    conversations: C,
    avatars: A,
    replies: R,
}

impl<C, A, R> ConversationService<C, A, R>
where
    C: ConversationRepository,
    A: AvatarRepository,
    R: ReplyGenerator,
{
    pub fn new(conversations: C, avatars: A, replies: R) -> Self {
        Self {
            conversations,
            avatars,
            replies,
        }
    }

    /// Start a conversation with an active avatar.
    ///
    /// The avatar is checked only here. Deactivating it later does not end
    /// or block the conversation.
    pub async fn start(
        &self,
        request: StartConversationRequest,
    ) -> Result<Conversation, ConversationError> {
        let avatar = self
            .avatars
            .find(&request.avatar_id, Visibility::Active)
            .await
            .map_err(unavailable)?
            .ok_or(ConversationError::AvatarNotFound)?;

        let conversation = Conversation {
            id: ConversationId::new(),
            avatar_id: avatar.id,
            participant_name: request.participant_name,
            messages: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
            status: ConversationStatus::Active,
        };

        let conversation = self
            .conversations
            .create(&conversation)
            .await
            .map_err(unavailable)?;
        info!(conversation_id = %conversation.id, avatar_id = %avatar.id, "Conversation started");
        Ok(conversation)
    }

    /// Append a message and, unless it came from the avatar, the avatar's reply.
    ///
    /// Returns the messages written by this call, inbound first. The two
    /// writes are independent: if reply generation fails, the inbound message
    /// stays stored and `ConversationError::Reply` is returned. Ended
    /// conversations still accept messages.
    pub async fn append_message(
        &self,
        id: &ConversationId,
        request: AppendMessageRequest,
    ) -> Result<Vec<Message>, ConversationError> {
        let conversation = self.get(id).await?;

        let inbound = Message::now(request.sender, request.content);
        if !self
            .conversations
            .append_message(id, &inbound)
            .await
            .map_err(unavailable)?
        {
            return Err(ConversationError::NotFound);
        }
        debug!(conversation_id = %id, sender = %inbound.sender, "Message appended");

        if inbound.is_from_avatar() {
            return Ok(vec![inbound]);
        }

        // The avatar may have been deactivated since the conversation began.
        let Some(avatar) = self
            .avatars
            .find(&conversation.avatar_id, Visibility::Historical)
            .await
            .map_err(unavailable)?
        else {
            warn!(conversation_id = %id, avatar_id = %conversation.avatar_id, "Avatar record missing, reply skipped");
            return Ok(vec![inbound]);
        };

        let text = self
            .replies
            .generate_reply(&avatar.name, &avatar.personality, &inbound.content)
            .await
            .map_err(|e| {
                warn!(conversation_id = %id, error = %e, "Reply generation failed");
                ConversationError::Reply(e.to_string())
            })?;

        let reply = Message::now(AVATAR_SENDER, text);
        if !self
            .conversations
            .append_message(id, &reply)
            .await
            .map_err(unavailable)?
        {
            return Err(ConversationError::NotFound);
        }

        Ok(vec![inbound, reply])
    }

    /// Mark a conversation ended. Ending twice refreshes `ended_at`.
    pub async fn end(&self, id: &ConversationId) -> Result<(), ConversationError> {
        if !self
            .conversations
            .mark_ended(id, Utc::now())
            .await
            .map_err(unavailable)?
        {
            return Err(ConversationError::NotFound);
        }
        info!(conversation_id = %id, "Conversation ended");
        Ok(())
    }

    pub async fn get(&self, id: &ConversationId) -> Result<Conversation, ConversationError> {
        self.conversations
            .get(id)
            .await
            .map_err(unavailable)?
            .ok_or(ConversationError::NotFound)
    }

    /// List conversations ordered by start time, optionally for one avatar.
    pub async fn list(
        &self,
        avatar_id: Option<&AvatarId>,
    ) -> Result<Vec<Conversation>, ConversationError> {
        self.conversations.list(avatar_id).await.map_err(unavailable)
    }
}

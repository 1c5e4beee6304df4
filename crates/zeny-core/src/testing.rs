//! In-memory fakes for the core ports, shared by service tests.
//!
//! Each fake is cheaply cloneable and clones share state, so a test can keep
//! a handle to inspect or poke the store after handing one to a service.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use zeny_types::avatar::{Avatar, AvatarId};
use zeny_types::conversation::{Conversation, ConversationId, ConversationStatus, Message};
use zeny_types::error::{AuthError, RepositoryError};
use zeny_types::summary::{Summary, SummaryId};
use zeny_types::user::{TokenClaims, User, UserId};

use crate::auth::credential::{CredentialHasher, HashError};
use crate::auth::token::TokenService;
use crate::reply::{ReplyError, ReplyGenerator};
use crate::repository::avatar::{AvatarRepository, Visibility};
use crate::repository::conversation::ConversationRepository;
use crate::repository::summary::SummaryRepository;
use crate::repository::user::UserRepository;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MemoryUsers {
    users: Arc<Mutex<Vec<User>>>,
}

impl MemoryUsers {
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

impl UserRepository for MemoryUsers {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_admin(&self) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.is_admin).cloned())
    }

    async fn update_credentials(
        &self,
        id: &UserId,
        username: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == username && u.id != *id) {
            return Err(RepositoryError::Conflict(format!(
                "username '{username}' already exists"
            )));
        }
        let user = users
            .iter_mut()
            .find(|u| u.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        user.username = username.to_string();
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Avatars
// ---------------------------------------------------------------------------

/// Build an active avatar for `owner` with fixed personality text.
pub fn sample_avatar(owner: UserId, name: &str) -> Avatar {
    Avatar {
        id: AvatarId::new(),
        name: name.to_string(),
        personality: "curious and kind".to_string(),
        description: "a friendly guide".to_string(),
        owner_id: owner,
        knowledge_base: None,
        avatar_image: None,
        is_active: true,
        created_at: Utc::now(),
    }
}

#[derive(Clone, Default)]
pub struct MemoryAvatars {
    avatars: Arc<Mutex<Vec<Avatar>>>,
}

impl MemoryAvatars {
    pub fn insert(&self, avatar: Avatar) -> Avatar {
        self.avatars.lock().unwrap().push(avatar.clone());
        avatar
    }

    pub fn set_active(&self, id: &AvatarId, active: bool) {
        if let Some(a) = self.avatars.lock().unwrap().iter_mut().find(|a| a.id == *id) {
            a.is_active = active;
        }
    }

    /// Physically drop a record, simulating data loss outside the service.
    pub fn remove(&self, id: &AvatarId) {
        self.avatars.lock().unwrap().retain(|a| a.id != *id);
    }

    fn snapshot(&self) -> Vec<Avatar> {
        self.avatars.lock().unwrap().clone()
    }
}

impl AvatarRepository for MemoryAvatars {
    async fn create(&self, avatar: &Avatar) -> Result<Avatar, RepositoryError> {
        Ok(self.insert(avatar.clone()))
    }

    async fn find(
        &self,
        id: &AvatarId,
        visibility: Visibility,
    ) -> Result<Option<Avatar>, RepositoryError> {
        Ok(self
            .avatars
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == *id && visibility.permits(a))
            .cloned())
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Avatar>, RepositoryError> {
        let visibility = Visibility::Owner(*owner);
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|a| visibility.permits(a))
            .collect())
    }

    async fn update(&self, avatar: &Avatar, owner: &UserId) -> Result<Avatar, RepositoryError> {
        let visibility = Visibility::Owner(*owner);
        let mut avatars = self.avatars.lock().unwrap();
        let slot = avatars
            .iter_mut()
            .find(|a| a.id == avatar.id && visibility.permits(a))
            .ok_or(RepositoryError::NotFound)?;
        let stored = Avatar {
            is_active: slot.is_active && avatar.is_active,
            ..avatar.clone()
        };
        *slot = stored.clone();
        Ok(stored)
    }

    async fn deactivate(&self, id: &AvatarId, owner: &UserId) -> Result<bool, RepositoryError> {
        let visibility = Visibility::Owner(*owner);
        let mut avatars = self.avatars.lock().unwrap();
        match avatars
            .iter_mut()
            .find(|a| a.id == *id && visibility.permits(a))
        {
            Some(a) => {
                a.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversations
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MemoryConversations {
    conversations: Arc<Mutex<Vec<Conversation>>>,
}

impl MemoryConversations {
    pub fn insert(&self, conversation: Conversation) -> Conversation {
        self.conversations.lock().unwrap().push(conversation.clone());
        conversation
    }

    pub fn push_message(&self, id: &ConversationId, message: Message) {
        if let Some(c) = self
            .conversations
            .lock()
            .unwrap()
            .iter_mut()
            .find(|c| c.id == *id)
        {
            c.messages.push(message);
        }
    }
}

impl ConversationRepository for MemoryConversations {
    async fn create(&self, conversation: &Conversation) -> Result<Conversation, RepositoryError> {
        Ok(self.insert(conversation.clone()))
    }

    async fn get(&self, id: &ConversationId) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self
            .conversations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == *id)
            .cloned())
    }

    async fn list(&self, avatar_id: Option<&AvatarId>) -> Result<Vec<Conversation>, RepositoryError> {
        Ok(self
            .conversations
            .lock()
            .unwrap()
            .iter()
            .filter(|c| avatar_id.is_none_or(|id| c.avatar_id == *id))
            .cloned()
            .collect())
    }

    async fn append_message(
        &self,
        id: &ConversationId,
        message: &Message,
    ) -> Result<bool, RepositoryError> {
        let mut conversations = self.conversations.lock().unwrap();
        match conversations.iter_mut().find(|c| c.id == *id) {
            Some(c) => {
                c.messages.push(message.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_ended(
        &self,
        id: &ConversationId,
        ended_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut conversations = self.conversations.lock().unwrap();
        match conversations.iter_mut().find(|c| c.id == *id) {
            Some(c) => {
                c.status = ConversationStatus::Ended;
                c.ended_at = Some(ended_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Summary store that resolves owner scoping through a shared avatar fake.
#[derive(Clone)]
pub struct MemorySummaries {
    summaries: Arc<Mutex<Vec<Summary>>>,
    avatars: MemoryAvatars,
}

impl MemorySummaries {
    pub fn new(avatars: MemoryAvatars) -> Self {
        Self {
            summaries: Arc::default(),
            avatars,
        }
    }

    /// Newest first; later insertions win ties.
    fn newest_first<'a>(rows: impl DoubleEndedIterator<Item = &'a Summary>) -> Vec<Summary> {
        let mut rows: Vec<Summary> = rows.rev().cloned().collect();
        rows.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        rows
    }
}

impl SummaryRepository for MemorySummaries {
    async fn insert_if_absent(&self, summary: &Summary) -> Result<Summary, RepositoryError> {
        let mut summaries = self.summaries.lock().unwrap();
        if let Some(existing) = summaries
            .iter()
            .find(|s| s.conversation_id == summary.conversation_id)
        {
            return Ok(existing.clone());
        }
        summaries.push(summary.clone());
        Ok(summary.clone())
    }

    async fn get(&self, id: &SummaryId) -> Result<Option<Summary>, RepositoryError> {
        Ok(self.summaries.lock().unwrap().iter().find(|s| s.id == *id).cloned())
    }

    async fn get_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<Summary>, RepositoryError> {
        Ok(self
            .summaries
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.conversation_id == *conversation_id)
            .cloned())
    }

    async fn list_for_avatar(&self, avatar_id: &AvatarId) -> Result<Vec<Summary>, RepositoryError> {
        let summaries = self.summaries.lock().unwrap();
        Ok(Self::newest_first(
            summaries.iter().filter(|s| s.avatar_id == *avatar_id),
        ))
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Summary>, RepositoryError> {
        let visibility = Visibility::Owner(*owner);
        let visible: Vec<AvatarId> = self
            .avatars
            .snapshot()
            .into_iter()
            .filter(|a| visibility.permits(a))
            .map(|a| a.id)
            .collect();
        let summaries = self.summaries.lock().unwrap();
        Ok(Self::newest_first(
            summaries.iter().filter(|s| visible.contains(&s.avatar_id)),
        ))
    }
}

// ---------------------------------------------------------------------------
// Credentials, tokens, replies
// ---------------------------------------------------------------------------

/// Reversible "hash" that keeps tests fast. Never use outside tests.
#[derive(Clone, Copy, Default)]
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    async fn hash_password(&self, password: &str) -> Result<String, HashError> {
        Ok(format!("plain${password}"))
    }

    async fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        stored_hash
            .strip_prefix("plain$")
            .is_some_and(|p| p == password)
    }
}

/// Unsigned token of the form `fake:{iat}:{exp}:{sub}`.
#[derive(Clone, Copy)]
pub struct FakeTokens {
    ttl_secs: i64,
}

impl FakeTokens {
    pub fn new(ttl_secs: i64) -> Self {
        Self { ttl_secs }
    }
}

impl TokenService for FakeTokens {
    fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        Ok(format!("fake:{iat}:{}:{subject}", iat + self.ttl_secs))
    }

    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let mut parts = token.splitn(4, ':');
        let (Some("fake"), Some(iat), Some(exp), Some(sub)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::Malformed);
        };
        let claims = TokenClaims {
            sub: sub.to_string(),
            iat: iat.parse().map_err(|_| AuthError::Malformed)?,
            exp: exp.parse().map_err(|_| AuthError::Malformed)?,
        };
        if !claims.is_valid_at(now) {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}

/// Reply generator that always fails.
#[derive(Clone, Copy)]
pub struct FailingReplies;

impl ReplyGenerator for FailingReplies {
    async fn generate_reply(&self, _: &str, _: &str, _: &str) -> Result<String, ReplyError> {
        Err(ReplyError::Unavailable("generator offline".to_string()))
    }
}

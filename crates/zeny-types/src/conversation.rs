//! Conversations held through an avatar and the messages they contain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::avatar::AvatarId;
use crate::id::uuid_id;

use std::fmt;
use std::str::FromStr;

/// Sender label reserved for messages produced by the avatar itself.
pub const AVATAR_SENDER: &str = "avatar";

uuid_id!(
    /// Unique identifier for a conversation.
    ConversationId
);

/// Lifecycle status of a conversation.
///
/// The only transition is `Active -> Ended`; it is never reversed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    #[default]
    Active,
    Ended,
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationStatus::Active => write!(f, "active"),
            ConversationStatus::Ended => write!(f, "ended"),
        }
    }
}

impl FromStr for ConversationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ConversationStatus::Active),
            "ended" => Ok(ConversationStatus::Ended),
            other => Err(format!("invalid conversation status: '{other}'")),
        }
    }
}

/// A single message. Messages are embedded in their conversation and are
/// ordered by insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Participant display name, or [`AVATAR_SENDER`].
    pub sender: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Build a message stamped with the current time.
    pub fn now(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Whether this message was produced by the avatar.
    pub fn is_from_avatar(&self) -> bool {
        self.sender == AVATAR_SENDER
    }
}

/// A conversation between a participant and an avatar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub avatar_id: AvatarId,
    pub participant_name: String,
    pub messages: Vec<Message>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: ConversationStatus,
}

/// Request to start a conversation against an active avatar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartConversationRequest {
    pub avatar_id: AvatarId,
    pub participant_name: String,
}

/// Inbound message. The timestamp is assigned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendMessageRequest {
    pub sender: String,
    pub content: String,
}

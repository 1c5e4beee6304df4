//! Derived conversation summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::avatar::AvatarId;
use crate::conversation::ConversationId;
use crate::id::uuid_id;

uuid_id!(
    /// Unique identifier for a summary.
    SummaryId
);

/// A descriptive artifact derived from exactly one conversation.
///
/// At most one summary exists per conversation; regenerating returns the
/// stored one untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub id: SummaryId,
    pub avatar_id: AvatarId,
    pub conversation_id: ConversationId,
    pub summary_text: String,
    pub key_points: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

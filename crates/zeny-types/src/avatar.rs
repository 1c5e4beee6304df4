//! Avatar personas: the owned, nameable entities that hold conversations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::uuid_id;
use crate::user::UserId;

uuid_id!(
    /// Unique identifier for an avatar persona.
    AvatarId
);

/// An avatar persona owned by a user.
///
/// Avatars are never physically removed. Deleting one flips `is_active` to
/// false, after which it is invisible to every owner-scoped operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub id: AvatarId,
    pub name: String,
    /// Freeform personality text fed to the reply generator.
    pub personality: String,
    pub description: String,
    pub owner_id: UserId,
    pub knowledge_base: Option<String>,
    /// Image reference (URL or data URI), stored verbatim.
    pub avatar_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to create an avatar. The owner is always the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAvatarRequest {
    pub name: String,
    pub personality: String,
    pub description: String,
    pub knowledge_base: Option<String>,
    pub avatar_image: Option<String>,
}

/// Partial update. Only fields that are present are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAvatarRequest {
    pub name: Option<String>,
    pub personality: Option<String>,
    pub description: Option<String>,
    pub knowledge_base: Option<String>,
    pub avatar_image: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateAvatarRequest {
    /// True when the request carries no field to change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.personality.is_none()
            && self.description.is_none()
            && self.knowledge_base.is_none()
            && self.avatar_image.is_none()
            && self.is_active.is_none()
    }
}

//! Avatar repository trait definition.
//!
//! Every read goes through a [`Visibility`] capability so the "not found,
//! never forbidden" policy lives in one place instead of in ad hoc filters.

use zeny_types::avatar::{Avatar, AvatarId};
use zeny_types::error::RepositoryError;
use zeny_types::user::UserId;

/// Which avatars a lookup is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Active avatars owned by this user.
    Owner(UserId),
    /// Any active avatar, regardless of owner.
    Active,
    /// Any avatar, including soft-deleted ones. Internal lookups only.
    Historical,
}

impl Visibility {
    /// Whether `avatar` is visible under this capability.
    pub fn permits(&self, avatar: &Avatar) -> bool {
        match self {
            Visibility::Owner(owner) => avatar.is_active && avatar.owner_id == *owner,
            Visibility::Active => avatar.is_active,
            Visibility::Historical => true,
        }
    }
}

/// Repository trait for avatar persistence.
pub trait AvatarRepository: Send + Sync {
    /// Insert a new avatar. Returns the stored avatar.
    fn create(
        &self,
        avatar: &Avatar,
    ) -> impl std::future::Future<Output = Result<Avatar, RepositoryError>> + Send;

    /// Find an avatar by ID if it is visible under `visibility`.
    fn find(
        &self,
        id: &AvatarId,
        visibility: Visibility,
    ) -> impl std::future::Future<Output = Result<Option<Avatar>, RepositoryError>> + Send;

    /// List active avatars owned by `owner`, oldest first.
    fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Avatar>, RepositoryError>> + Send;

    /// Persist the mutable fields of an active avatar owned by `owner`.
    ///
    /// `is_active` may only move from true to false. Fails with
    /// `RepositoryError::NotFound` when the avatar is absent, foreign, or
    /// was deactivated since it was read.
    fn update(
        &self,
        avatar: &Avatar,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<Avatar, RepositoryError>> + Send;

    /// Soft-delete an active avatar owned by `owner`.
    ///
    /// Returns `false` when nothing matched (absent, inactive, or foreign).
    fn deactivate(
        &self,
        id: &AvatarId,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}

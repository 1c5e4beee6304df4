//! Persona registry service.
//!
//! Owner-scoped CRUD over avatars with soft delete. Every lookup that acts on
//! behalf of a user goes through `Visibility::Owner`, so absent, inactive and
//! foreign avatars all come back as `AvatarError::NotFound`.

use chrono::Utc;
use tracing::info;
use zeny_types::avatar::{Avatar, AvatarId, CreateAvatarRequest, UpdateAvatarRequest};
use zeny_types::error::{AvatarError, RepositoryError};
use zeny_types::user::UserId;

use crate::repository::avatar::{AvatarRepository, Visibility};

fn unavailable(e: RepositoryError) -> AvatarError {
    AvatarError::Unavailable(e.to_string())
}

/// Trim a required text field, rejecting blank values.
fn required(field: &str, value: &str) -> Result<String, AvatarError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AvatarError::InvalidField(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

/// Service orchestrating the avatar persona lifecycle.
pub struct AvatarService<A: AvatarRepository> {
    repo: A,
}

impl<A: AvatarRepository> AvatarService<A> {
    pub fn new(repo: A) -> Self {
        Self { repo }
    }

    /// Create an avatar owned by `owner`.
    pub async fn create(
        &self,
        owner: &UserId,
        request: CreateAvatarRequest,
    ) -> Result<Avatar, AvatarError> {
        let avatar = Avatar {
            id: AvatarId::new(),
            name: required("name", &request.name)?,
            personality: required("personality", &request.personality)?,
            description: required("description", &request.description)?,
            owner_id: *owner,
            knowledge_base: request.knowledge_base,
            avatar_image: request.avatar_image,
            is_active: true,
            created_at: Utc::now(),
        };

        let avatar = self.repo.create(&avatar).await.map_err(unavailable)?;
        info!(avatar_id = %avatar.id, owner_id = %owner, "Avatar created");
        Ok(avatar)
    }

    /// Get an active avatar owned by `requester`.
    pub async fn get(&self, id: &AvatarId, requester: &UserId) -> Result<Avatar, AvatarError> {
        self.repo
            .find(id, Visibility::Owner(*requester))
            .await
            .map_err(unavailable)?
            .ok_or(AvatarError::NotFound)
    }

    /// List the active avatars owned by `owner`.
    pub async fn list(&self, owner: &UserId) -> Result<Vec<Avatar>, AvatarError> {
        self.repo.list_for_owner(owner).await.map_err(unavailable)
    }

    /// Apply the fields present in `request` to an avatar owned by `requester`.
    ///
    /// Setting `is_active` to false is a soft delete. Inactive avatars are not
    /// visible here, so an update can never reactivate one.
    pub async fn update(
        &self,
        id: &AvatarId,
        requester: &UserId,
        request: UpdateAvatarRequest,
    ) -> Result<Avatar, AvatarError> {
        let mut avatar = self.get(id, requester).await?;

        if let Some(name) = request.name {
            avatar.name = required("name", &name)?;
        }
        if let Some(personality) = request.personality {
            avatar.personality = required("personality", &personality)?;
        }
        if let Some(description) = request.description {
            avatar.description = required("description", &description)?;
        }
        if let Some(knowledge_base) = request.knowledge_base {
            avatar.knowledge_base = Some(knowledge_base);
        }
        if let Some(avatar_image) = request.avatar_image {
            avatar.avatar_image = Some(avatar_image);
        }
        if let Some(is_active) = request.is_active {
            avatar.is_active = is_active;
        }

        let avatar = self.repo.update(&avatar, requester).await.map_err(|e| match e {
            RepositoryError::NotFound => AvatarError::NotFound,
            other => unavailable(other),
        })?;
        info!(avatar_id = %avatar.id, "Avatar updated");
        Ok(avatar)
    }

    /// Soft-delete an avatar owned by `requester`.
    pub async fn soft_delete(&self, id: &AvatarId, requester: &UserId) -> Result<(), AvatarError> {
        if !self
            .repo
            .deactivate(id, requester)
            .await
            .map_err(unavailable)?
        {
            return Err(AvatarError::NotFound);
        }
        info!(avatar_id = %id, "Avatar deactivated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryAvatars;

    fn create_req(name: &str) -> CreateAvatarRequest {
        CreateAvatarRequest {
            name: name.to_string(),
            personality: "curious and kind".to_string(),
            description: "a friendly guide".to_string(),
            knowledge_base: None,
            avatar_image: None,
        }
    }

    fn service() -> AvatarService<MemoryAvatars> {
        AvatarService::new(MemoryAvatars::default())
    }

    #[tokio::test]
    async fn test_create_forces_owner_and_active() {
        let svc = service();
        let owner = UserId::new();
        let avatar = svc.create(&owner, create_req("Nova")).await.unwrap();
        assert_eq!(avatar.owner_id, owner);
        assert!(avatar.is_active);
        assert_eq!(svc.get(&avatar.id, &owner).await.unwrap().name, "Nova");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let svc = service();
        let owner = UserId::new();
        let mut req = create_req("  ");
        assert!(matches!(
            svc.create(&owner, req.clone()).await.unwrap_err(),
            AvatarError::InvalidField(_)
        ));
        req.name = "Nova".to_string();
        req.personality = String::new();
        assert!(matches!(
            svc.create(&owner, req).await.unwrap_err(),
            AvatarError::InvalidField(_)
        ));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_avatar() {
        let svc = service();
        let owner = UserId::new();
        let avatar = svc.create(&owner, create_req("Nova")).await.unwrap();

        svc.soft_delete(&avatar.id, &owner).await.unwrap();

        assert!(matches!(
            svc.get(&avatar.id, &owner).await.unwrap_err(),
            AvatarError::NotFound
        ));
        assert!(svc.list(&owner).await.unwrap().is_empty());
        assert!(matches!(
            svc.update(&avatar.id, &owner, UpdateAvatarRequest::default())
                .await
                .unwrap_err(),
            AvatarError::NotFound
        ));
        assert!(matches!(
            svc.soft_delete(&avatar.id, &owner).await.unwrap_err(),
            AvatarError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_cross_owner_access_is_not_found() {
        let svc = service();
        let owner = UserId::new();
        let stranger = UserId::new();
        let avatar = svc.create(&owner, create_req("Nova")).await.unwrap();

        assert!(matches!(
            svc.get(&avatar.id, &stranger).await.unwrap_err(),
            AvatarError::NotFound
        ));
        let update = UpdateAvatarRequest {
            name: Some("Hijacked".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update(&avatar.id, &stranger, update).await.unwrap_err(),
            AvatarError::NotFound
        ));
        assert!(matches!(
            svc.soft_delete(&avatar.id, &stranger).await.unwrap_err(),
            AvatarError::NotFound
        ));
        assert!(svc.list(&stranger).await.unwrap().is_empty());
        assert_eq!(svc.get(&avatar.id, &owner).await.unwrap().name, "Nova");
    }

    #[tokio::test]
    async fn test_update_applies_only_present_fields() {
        let svc = service();
        let owner = UserId::new();
        let avatar = svc.create(&owner, create_req("Nova")).await.unwrap();

        let updated = svc
            .update(
                &avatar.id,
                &owner,
                UpdateAvatarRequest {
                    description: Some("a stern mentor".to_string()),
                    knowledge_base: Some("astronomy".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Nova");
        assert_eq!(updated.personality, "curious and kind");
        assert_eq!(updated.description, "a stern mentor");
        assert_eq!(updated.knowledge_base.as_deref(), Some("astronomy"));
        assert_eq!(updated.created_at, avatar.created_at);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name() {
        let svc = service();
        let owner = UserId::new();
        let avatar = svc.create(&owner, create_req("Nova")).await.unwrap();
        let err = svc
            .update(
                &avatar.id,
                &owner,
                UpdateAvatarRequest {
                    name: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AvatarError::InvalidField(_)));
    }

    #[tokio::test]
    async fn test_update_is_active_false_deactivates() {
        let svc = service();
        let owner = UserId::new();
        let avatar = svc.create(&owner, create_req("Nova")).await.unwrap();
        svc.update(
            &avatar.id,
            &owner,
            UpdateAvatarRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(matches!(
            svc.get(&avatar.id, &owner).await.unwrap_err(),
            AvatarError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_list_only_own_active_avatars() {
        let svc = service();
        let owner = UserId::new();
        let other = UserId::new();
        let a = svc.create(&owner, create_req("A")).await.unwrap();
        let b = svc.create(&owner, create_req("B")).await.unwrap();
        svc.create(&other, create_req("C")).await.unwrap();
        svc.soft_delete(&a.id, &owner).await.unwrap();

        let listed = svc.list(&owner).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, b.id);
    }
}

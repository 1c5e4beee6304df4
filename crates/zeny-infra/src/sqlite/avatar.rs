//! SQLite avatar repository implementation.
//!
//! Visibility is translated into SQL predicates so that an invisible avatar
//! never leaves the database.

use sqlx::Row;
use zeny_core::repository::avatar::{AvatarRepository, Visibility};
use zeny_types::avatar::{Avatar, AvatarId};
use zeny_types::error::RepositoryError;
use zeny_types::user::UserId;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `AvatarRepository`.
pub struct SqliteAvatarRepository {
    pool: DatabasePool,
}

impl SqliteAvatarRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Avatar.
struct AvatarRow {
    id: String,
    name: String,
    personality: String,
    description: String,
    owner_id: String,
    knowledge_base: Option<String>,
    avatar_image: Option<String>,
    is_active: bool,
    created_at: String,
}

impl AvatarRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            personality: row.try_get("personality")?,
            description: row.try_get("description")?,
            owner_id: row.try_get("owner_id")?,
            knowledge_base: row.try_get("knowledge_base")?,
            avatar_image: row.try_get("avatar_image")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_avatar(self) -> Result<Avatar, RepositoryError> {
        let id = self
            .id
            .parse::<AvatarId>()
            .map_err(|e| RepositoryError::Query(format!("invalid avatar id: {e}")))?;
        let owner_id = self
            .owner_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid owner id: {e}")))?;

        Ok(Avatar {
            id,
            name: self.name,
            personality: self.personality,
            description: self.description,
            owner_id,
            knowledge_base: self.knowledge_base,
            avatar_image: self.avatar_image,
            is_active: self.is_active,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl AvatarRepository for SqliteAvatarRepository {
    async fn create(&self, avatar: &Avatar) -> Result<Avatar, RepositoryError> {
        sqlx::query(
            "INSERT INTO avatars (id, name, personality, description, owner_id, knowledge_base, avatar_image, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(avatar.id.to_string())
        .bind(&avatar.name)
        .bind(&avatar.personality)
        .bind(&avatar.description)
        .bind(avatar.owner_id.to_string())
        .bind(&avatar.knowledge_base)
        .bind(&avatar.avatar_image)
        .bind(avatar.is_active)
        .bind(format_datetime(&avatar.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(avatar.clone())
    }

    async fn find(
        &self,
        id: &AvatarId,
        visibility: Visibility,
    ) -> Result<Option<Avatar>, RepositoryError> {
        let query = match visibility {
            Visibility::Owner(owner) => {
                sqlx::query("SELECT * FROM avatars WHERE id = ? AND is_active = 1 AND owner_id = ?")
                    .bind(id.to_string())
                    .bind(owner.to_string())
            }
            Visibility::Active => sqlx::query("SELECT * FROM avatars WHERE id = ? AND is_active = 1")
                .bind(id.to_string()),
            Visibility::Historical => {
                sqlx::query("SELECT * FROM avatars WHERE id = ?").bind(id.to_string())
            }
        };

        let row = query
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| AvatarRow::from_row(&row).map_err(query_error)?.into_avatar())
            .transpose()
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Avatar>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM avatars WHERE owner_id = ? AND is_active = 1 ORDER BY created_at ASC, rowid ASC",
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut avatars = Vec::with_capacity(rows.len());
        for row in &rows {
            avatars.push(AvatarRow::from_row(row).map_err(query_error)?.into_avatar()?);
        }
        Ok(avatars)
    }

    async fn update(&self, avatar: &Avatar, owner: &UserId) -> Result<Avatar, RepositoryError> {
        let result = sqlx::query(
            "UPDATE avatars SET name = ?, personality = ?, description = ?, knowledge_base = ?, avatar_image = ?,
                    is_active = MIN(is_active, ?)
             WHERE id = ? AND owner_id = ? AND is_active = 1",
        )
        .bind(&avatar.name)
        .bind(&avatar.personality)
        .bind(&avatar.description)
        .bind(&avatar.knowledge_base)
        .bind(&avatar.avatar_image)
        .bind(avatar.is_active)
        .bind(avatar.id.to_string())
        .bind(owner.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(avatar.clone())
    }

    async fn deactivate(&self, id: &AvatarId, owner: &UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE avatars SET is_active = 0 WHERE id = ? AND owner_id = ? AND is_active = 1",
        )
        .bind(id.to_string())
        .bind(owner.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }
}

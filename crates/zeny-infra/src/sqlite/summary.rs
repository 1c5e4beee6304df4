//! SQLite summary repository implementation.
//!
//! `summaries.conversation_id` is UNIQUE. Insert-if-absent is a single
//! `INSERT ... ON CONFLICT DO NOTHING` followed by a re-read, so concurrent
//! generators for the same conversation all observe the one stored row.

use sqlx::Row;
use zeny_core::repository::summary::SummaryRepository;
use zeny_types::avatar::AvatarId;
use zeny_types::conversation::ConversationId;
use zeny_types::error::RepositoryError;
use zeny_types::summary::{Summary, SummaryId};
use zeny_types::user::UserId;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `SummaryRepository`.
pub struct SqliteSummaryRepository {
    pool: DatabasePool,
}

impl SqliteSummaryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Summary.
struct SummaryRow {
    id: String,
    avatar_id: String,
    conversation_id: String,
    summary_text: String,
    key_points: String,
    generated_at: String,
}

impl SummaryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            avatar_id: row.try_get("avatar_id")?,
            conversation_id: row.try_get("conversation_id")?,
            summary_text: row.try_get("summary_text")?,
            key_points: row.try_get("key_points")?,
            generated_at: row.try_get("generated_at")?,
        })
    }

    fn into_summary(self) -> Result<Summary, RepositoryError> {
        let id = self
            .id
            .parse::<SummaryId>()
            .map_err(|e| RepositoryError::Query(format!("invalid summary id: {e}")))?;
        let avatar_id = self
            .avatar_id
            .parse::<AvatarId>()
            .map_err(|e| RepositoryError::Query(format!("invalid avatar id: {e}")))?;
        let conversation_id = self
            .conversation_id
            .parse::<ConversationId>()
            .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?;
        let key_points: Vec<String> = serde_json::from_str(&self.key_points)
            .map_err(|e| RepositoryError::Query(format!("invalid key_points JSON: {e}")))?;

        Ok(Summary {
            id,
            avatar_id,
            conversation_id,
            summary_text: self.summary_text,
            key_points,
            generated_at: parse_datetime(&self.generated_at)?,
        })
    }
}

fn collect(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Summary>, RepositoryError> {
    let mut summaries = Vec::with_capacity(rows.len());
    for row in rows {
        summaries.push(SummaryRow::from_row(row).map_err(query_error)?.into_summary()?);
    }
    Ok(summaries)
}

impl SummaryRepository for SqliteSummaryRepository {
    async fn insert_if_absent(&self, summary: &Summary) -> Result<Summary, RepositoryError> {
        let key_points_json = serde_json::to_string(&summary.key_points)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO summaries (id, avatar_id, conversation_id, summary_text, key_points, generated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(conversation_id) DO NOTHING",
        )
        .bind(summary.id.to_string())
        .bind(summary.avatar_id.to_string())
        .bind(summary.conversation_id.to_string())
        .bind(&summary.summary_text)
        .bind(&key_points_json)
        .bind(format_datetime(&summary.generated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() > 0 {
            return Ok(summary.clone());
        }

        // Lost the race: return the row that won. Read through the writer so
        // the lookup is ordered after the conflicting insert.
        let row = sqlx::query("SELECT * FROM summaries WHERE conversation_id = ?")
            .bind(summary.conversation_id.to_string())
            .fetch_one(&self.pool.writer)
            .await
            .map_err(query_error)?;
        SummaryRow::from_row(&row).map_err(query_error)?.into_summary()
    }

    async fn get(&self, id: &SummaryId) -> Result<Option<Summary>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM summaries WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| SummaryRow::from_row(&row).map_err(query_error)?.into_summary())
            .transpose()
    }

    async fn get_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<Summary>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM summaries WHERE conversation_id = ?")
            .bind(conversation_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| SummaryRow::from_row(&row).map_err(query_error)?.into_summary())
            .transpose()
    }

    async fn list_for_avatar(&self, avatar_id: &AvatarId) -> Result<Vec<Summary>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM summaries WHERE avatar_id = ? ORDER BY generated_at DESC, rowid DESC",
        )
        .bind(avatar_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        collect(&rows)
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Summary>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT s.* FROM summaries s
             JOIN avatars a ON a.id = s.avatar_id
             WHERE a.owner_id = ? AND a.is_active = 1
             ORDER BY s.generated_at DESC, s.rowid DESC",
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        collect(&rows)
    }
}

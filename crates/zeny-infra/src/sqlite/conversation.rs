//! SQLite conversation repository implementation.
//!
//! Conversations live in `conversations`; their messages live in
//! `conversation_messages`, ordered by an autoincrement sequence.

use chrono::{DateTime, Utc};
use sqlx::Row;
use zeny_core::repository::conversation::ConversationRepository;
use zeny_types::avatar::AvatarId;
use zeny_types::conversation::{Conversation, ConversationId, ConversationStatus, Message};
use zeny_types::error::RepositoryError;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn load_messages(&self, id: &str) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT sender, content, timestamp FROM conversation_messages WHERE conversation_id = ? ORDER BY seq ASC",
        )
        .bind(id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            messages.push(MessageRow::from_row(row).map_err(query_error)?.into_message()?);
        }
        Ok(messages)
    }

    async fn hydrate(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Conversation, RepositoryError> {
        let conversation_row = ConversationRow::from_row(row).map_err(query_error)?;
        let messages = self.load_messages(&conversation_row.id).await?;
        conversation_row.into_conversation(messages)
    }
}

/// Internal row type for mapping SQLite rows to domain Conversation.
struct ConversationRow {
    id: String,
    avatar_id: String,
    participant_name: String,
    status: String,
    started_at: String,
    ended_at: Option<String>,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            avatar_id: row.try_get("avatar_id")?,
            participant_name: row.try_get("participant_name")?,
            status: row.try_get("status")?,
            started_at: row.try_get("started_at")?,
            ended_at: row.try_get("ended_at")?,
        })
    }

    fn into_conversation(self, messages: Vec<Message>) -> Result<Conversation, RepositoryError> {
        let id = self
            .id
            .parse::<ConversationId>()
            .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?;
        let avatar_id = self
            .avatar_id
            .parse::<AvatarId>()
            .map_err(|e| RepositoryError::Query(format!("invalid avatar id: {e}")))?;
        let status: ConversationStatus = self.status.parse().map_err(RepositoryError::Query)?;

        Ok(Conversation {
            id,
            avatar_id,
            participant_name: self.participant_name,
            messages,
            started_at: parse_datetime(&self.started_at)?,
            ended_at: self.ended_at.as_deref().map(parse_datetime).transpose()?,
            status,
        })
    }
}

struct MessageRow {
    sender: String,
    content: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            sender: row.try_get("sender")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        Ok(Message {
            sender: self.sender,
            content: self.content,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

impl ConversationRepository for SqliteConversationRepository {
    async fn create(&self, conversation: &Conversation) -> Result<Conversation, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query(
            "INSERT INTO conversations (id, avatar_id, participant_name, status, started_at, ended_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(conversation.id.to_string())
        .bind(conversation.avatar_id.to_string())
        .bind(&conversation.participant_name)
        .bind(conversation.status.to_string())
        .bind(format_datetime(&conversation.started_at))
        .bind(conversation.ended_at.as_ref().map(format_datetime))
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        for message in &conversation.messages {
            sqlx::query(
                "INSERT INTO conversation_messages (conversation_id, sender, content, timestamp)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(conversation.id.to_string())
            .bind(&message.sender)
            .bind(&message.content)
            .bind(format_datetime(&message.timestamp))
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;
        }

        tx.commit().await.map_err(query_error)?;
        Ok(conversation.clone())
    }

    async fn get(&self, id: &ConversationId) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(self.hydrate(&row).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, avatar_id: Option<&AvatarId>) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = match avatar_id {
            Some(avatar_id) => {
                sqlx::query(
                    "SELECT * FROM conversations WHERE avatar_id = ? ORDER BY started_at ASC, rowid ASC",
                )
                .bind(avatar_id.to_string())
                .fetch_all(&self.pool.reader)
                .await
            }
            None => {
                sqlx::query("SELECT * FROM conversations ORDER BY started_at ASC, rowid ASC")
                    .fetch_all(&self.pool.reader)
                    .await
            }
        }
        .map_err(query_error)?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in &rows {
            conversations.push(self.hydrate(row).await?);
        }
        Ok(conversations)
    }

    async fn append_message(
        &self,
        id: &ConversationId,
        message: &Message,
    ) -> Result<bool, RepositoryError> {
        // Single statement, so a missing conversation inserts nothing.
        let result = sqlx::query(
            "INSERT INTO conversation_messages (conversation_id, sender, content, timestamp)
             SELECT id, ?, ?, ? FROM conversations WHERE id = ?",
        )
        .bind(&message.sender)
        .bind(&message.content)
        .bind(format_datetime(&message.timestamp))
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_ended(
        &self,
        id: &ConversationId,
        ended_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE conversations SET status = ?, ended_at = ? WHERE id = ?")
            .bind(ConversationStatus::Ended.to_string())
            .bind(format_datetime(&ended_at))
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }
}

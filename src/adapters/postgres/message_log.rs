//! PostgreSQL implementation of MessageLog.
//!
//! Conversations live in `conversation`, their turns in `message`. Deleting a
//! conversation relies on `ON DELETE CASCADE` for messages and assignments.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::conversation::{preview_of, Conversation, Message, Sender};
use crate::domain::foundation::{
    AccountId, ConversationId, DomainError, ErrorCode, MessageId, OwnedByAccount, Timestamp,
};
use crate::domain::story::Intent;
use crate::ports::{ConversationSummary, MessageLog};

/// PostgreSQL implementation of MessageLog.
#[derive(Clone)]
pub struct PostgresMessageLog {
    pool: PgPool,
}

impl PostgresMessageLog {
    /// Creates a new PostgresMessageLog.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageLog for PostgresMessageLog {
    async fn create_with_message(
        &self,
        conversation: &Conversation,
        first: &Message,
    ) -> Result<(), DomainError> {
        if first.conversation_id() != conversation.id() {
            return Err(DomainError::validation(
                "conversation_id",
                "First message belongs to a different conversation",
            ));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::database(format!("Failed to start transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO conversation (id, owner_id, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(conversation.id().as_uuid())
        .bind(conversation.owner_id().as_str())
        .bind(conversation.created_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert conversation: {}", e)))?;

        insert_message(&mut *tx, first).await?;

        tx.commit().await.map_err(|e| {
            DomainError::database(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    async fn find_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, created_at
            FROM conversation
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch conversation: {}", e)))?;

        row.map(|row| row_to_conversation(&row)).transpose()
    }

    async fn append(&self, message: &Message) -> Result<(), DomainError> {
        insert_message(&self.pool, message).await
    }

    async fn messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, sender, code, content, created_at
            FROM message
            WHERE conversation_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(conversation_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch messages: {}", e)))?;

        rows.iter().map(row_to_message).collect()
    }

    async fn list_for_owner(
        &self,
        owner: &AccountId,
    ) -> Result<Vec<ConversationSummary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.id,
                c.created_at,
                (SELECT COUNT(*) FROM message m WHERE m.conversation_id = c.id) AS message_count,
                (SELECT m.content FROM message m
                    WHERE m.conversation_id = c.id AND m.sender = 'USER'
                    ORDER BY m.created_at ASC, m.id ASC
                    LIMIT 1) AS first_user_message
            FROM conversation c
            WHERE c.owner_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list conversations: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| {
                let id: uuid::Uuid = row.get("id");
                let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
                let message_count: i64 = row.get("message_count");
                let first_user_message: Option<String> = row.get("first_user_message");

                ConversationSummary {
                    id: ConversationId::from_uuid(id),
                    created_at: Timestamp::from_datetime(created_at),
                    preview: first_user_message
                        .as_deref()
                        .map(preview_of)
                        .unwrap_or_default(),
                    message_count: message_count.max(0) as u32,
                }
            })
            .collect())
    }

    async fn delete(&self, id: &ConversationId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM conversation WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete conversation: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(conversation_not_found(id));
        }

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════════

pub(super) fn conversation_not_found(id: &ConversationId) -> DomainError {
    DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
        .with_detail("conversation_id", id.to_string())
}

/// Maps a foreign-key violation onto `ConversationNotFound`.
pub(super) fn map_insert_error(err: sqlx::Error, id: &ConversationId, what: &str) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => conversation_not_found(id),
        _ => DomainError::database(format!("Failed to insert {}: {}", what, err)),
    }
}

async fn insert_message<'e, E>(executor: E, message: &Message) -> Result<(), DomainError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO message (id, conversation_id, sender, code, content, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(message.id().as_uuid())
    .bind(message.conversation_id().as_uuid())
    .bind(message.sender().as_str())
    .bind(message.intent().code())
    .bind(message.content())
    .bind(message.created_at().as_datetime())
    .execute(executor)
    .await
    .map_err(|e| map_insert_error(e, message.conversation_id(), "message"))?;

    Ok(())
}

fn row_to_conversation(row: &PgRow) -> Result<Conversation, DomainError> {
    let id: uuid::Uuid = row.get("id");
    let owner_id: String = row.get("owner_id");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    let owner_id = AccountId::new(owner_id)
        .map_err(|e| DomainError::database(format!("Invalid stored owner: {}", e)))?;

    Ok(Conversation::reconstitute(
        ConversationId::from_uuid(id),
        owner_id,
        Timestamp::from_datetime(created_at),
    ))
}

fn row_to_message(row: &PgRow) -> Result<Message, DomainError> {
    let id: uuid::Uuid = row.get("id");
    let conversation_id: uuid::Uuid = row.get("conversation_id");
    let sender: &str = row.get("sender");
    let code: i16 = row.get("code");
    let content: String = row.get("content");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    Ok(Message::reconstitute(
        MessageId::from_uuid(id),
        ConversationId::from_uuid(conversation_id),
        str_to_sender(sender)?,
        code_to_intent(code)?,
        content,
        Timestamp::from_datetime(created_at),
    ))
}

fn str_to_sender(s: &str) -> Result<Sender, DomainError> {
    s.parse::<Sender>()
        .map_err(|_| DomainError::database(format!("Invalid stored sender: {}", s)))
}

fn code_to_intent(code: i16) -> Result<Intent, DomainError> {
    Intent::from_code(i64::from(code))
        .map_err(|e| DomainError::database(format!("Invalid stored intent: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_senders_round_trip() {
        for sender in [Sender::User, Sender::Model] {
            assert_eq!(str_to_sender(sender.as_str()).unwrap(), sender);
        }
        assert_eq!(
            str_to_sender("SYSTEM").unwrap_err().code,
            ErrorCode::DatabaseError
        );
    }

    #[test]
    fn stored_codes_round_trip() {
        for intent in Intent::ALL {
            assert_eq!(code_to_intent(intent.code()).unwrap(), intent);
        }
        assert_eq!(code_to_intent(4).unwrap_err().code, ErrorCode::DatabaseError);
    }

    #[test]
    fn not_found_carries_conversation_id() {
        let id = ConversationId::new();
        let err = conversation_not_found(&id);
        assert_eq!(err.code, ErrorCode::ConversationNotFound);
        assert_eq!(err.details.get("conversation_id"), Some(&id.to_string()));
    }
}

//! PostgreSQL implementation of StoryAssignmentRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::conversation::StoryAssignment;
use crate::domain::foundation::{AssignmentId, ConversationId, DomainError, Timestamp};
use crate::ports::StoryAssignmentRepository;

use super::message_log::map_insert_error;

/// PostgreSQL implementation of StoryAssignmentRepository.
#[derive(Clone)]
pub struct PostgresAssignmentRepository {
    pool: PgPool,
}

impl PostgresAssignmentRepository {
    /// Creates a new PostgresAssignmentRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoryAssignmentRepository for PostgresAssignmentRepository {
    async fn save(&self, assignment: &StoryAssignment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO story_assignment (id, conversation_id, child_username, title, assigned_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(assignment.id.as_uuid())
        .bind(assignment.conversation_id.as_uuid())
        .bind(&assignment.child_username)
        .bind(&assignment.title)
        .bind(assignment.assigned_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &assignment.conversation_id, "story assignment"))?;

        Ok(())
    }

    async fn for_child(&self, child_username: &str) -> Result<Vec<StoryAssignment>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, child_username, title, assigned_at
            FROM story_assignment
            WHERE child_username = $1
            ORDER BY assigned_at DESC
            "#,
        )
        .bind(child_username)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch story assignments: {}", e)))?;

        Ok(rows.iter().map(row_to_assignment).collect())
    }
}

fn row_to_assignment(row: &PgRow) -> StoryAssignment {
    let id: uuid::Uuid = row.get("id");
    let conversation_id: uuid::Uuid = row.get("conversation_id");
    let assigned_at: chrono::DateTime<chrono::Utc> = row.get("assigned_at");

    StoryAssignment {
        id: AssignmentId::from_uuid(id),
        conversation_id: ConversationId::from_uuid(conversation_id),
        child_username: row.get("child_username"),
        title: row.get("title"),
        assigned_at: Timestamp::from_datetime(assigned_at),
    }
}

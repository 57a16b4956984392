//! ListAssignmentsHandler - Stories assigned to a child, newest first.

use std::sync::Arc;

use crate::domain::conversation::StoryAssignment;
use crate::ports::StoryAssignmentRepository;

use super::errors::StoryTurnError;

/// Query for a child's assignments.
#[derive(Debug, Clone)]
pub struct ListAssignmentsQuery {
    pub child_username: String,
}

/// Handler for listing a child's assignments.
pub struct ListAssignmentsHandler {
    assignments: Arc<dyn StoryAssignmentRepository>,
}

impl ListAssignmentsHandler {
    pub fn new(assignments: Arc<dyn StoryAssignmentRepository>) -> Self {
        Self { assignments }
    }

    pub async fn handle(
        &self,
        query: ListAssignmentsQuery,
    ) -> Result<Vec<StoryAssignment>, StoryTurnError> {
        let child = query.child_username.trim();
        if child.is_empty() {
            return Err(StoryTurnError::Validation(
                "child username cannot be empty".to_string(),
            ));
        }
        Ok(self.assignments.for_child(child).await?)
    }
}

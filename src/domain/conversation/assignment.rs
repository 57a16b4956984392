//! Story assignments.
//!
//! An adult account can hand the current story of one of its conversations to
//! a child account. The title is copied at assignment time; the assignment
//! disappears with its conversation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AssignmentId, ConversationId, Timestamp, ValidationError};

/// A story handed to a child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryAssignment {
    pub id: AssignmentId,
    pub conversation_id: ConversationId,
    pub child_username: String,
    pub title: String,
    pub assigned_at: Timestamp,
}

impl StoryAssignment {
    /// Creates a new assignment.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the child username is blank
    pub fn new(
        conversation_id: ConversationId,
        child_username: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let child_username = child_username.into().trim().to_string();
        if child_username.is_empty() {
            return Err(ValidationError::empty_field("child_username"));
        }

        Ok(Self {
            id: AssignmentId::new(),
            conversation_id,
            child_username,
            title: title.into(),
            assigned_at: Timestamp::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_username() {
        let assignment =
            StoryAssignment::new(ConversationId::new(), "  lily ", "The Moon Boat").unwrap();
        assert_eq!(assignment.child_username, "lily");
        assert_eq!(assignment.title, "The Moon Boat");
    }

    #[test]
    fn blank_username_is_rejected() {
        let err = StoryAssignment::new(ConversationId::new(), "  ", "T").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("child_username"));
    }
}

//! Story assignment repository port.

use crate::domain::conversation::StoryAssignment;
use crate::domain::foundation::DomainError;
use async_trait::async_trait;

/// Persistence for stories handed to child accounts.
///
/// Assignments are removed together with the conversation they were made
/// from; see [`MessageLog::delete`](super::MessageLog::delete).
#[async_trait]
pub trait StoryAssignmentRepository: Send + Sync {
    /// Save a new assignment.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the conversation doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn save(&self, assignment: &StoryAssignment) -> Result<(), DomainError>;

    /// Returns the assignments for a child, newest first.
    async fn for_child(&self, child_username: &str) -> Result<Vec<StoryAssignment>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_assignment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn StoryAssignmentRepository) {}
    }
}

//! AssignStoryHandler - Hands a conversation's current story to a child.

use std::sync::Arc;

use tracing::info;

use crate::domain::conversation::StoryAssignment;
use crate::domain::foundation::{AccountId, ConversationId};
use crate::domain::story::{extract_current_story, CONTINUED_STORY_TITLE};
use crate::ports::{MessageLog, StoryAssignmentRepository};

use super::access::{owned_conversation, ForeignAccess};
use super::errors::StoryTurnError;

/// Command to assign a story to a child account.
#[derive(Debug, Clone)]
pub struct AssignStoryCommand {
    pub account_id: AccountId,
    pub conversation_id: ConversationId,
    /// Opaque child username from the identity layer.
    pub child_username: String,
}

/// Handler for story assignments.
pub struct AssignStoryHandler {
    log: Arc<dyn MessageLog>,
    assignments: Arc<dyn StoryAssignmentRepository>,
}

impl AssignStoryHandler {
    pub fn new(log: Arc<dyn MessageLog>, assignments: Arc<dyn StoryAssignmentRepository>) -> Self {
        Self { log, assignments }
    }

    /// Records an assignment carrying the current story's title.
    pub async fn handle(&self, cmd: AssignStoryCommand) -> Result<StoryAssignment, StoryTurnError> {
        if cmd.child_username.trim().is_empty() {
            return Err(StoryTurnError::Validation(
                "child username cannot be empty".to_string(),
            ));
        }

        owned_conversation(
            self.log.as_ref(),
            &cmd.conversation_id,
            &cmd.account_id,
            ForeignAccess::NotFound,
        )
        .await?;

        let history = self.log.messages(&cmd.conversation_id).await?;
        let story = extract_current_story(&history, CONTINUED_STORY_TITLE)
            .ok_or(StoryTurnError::NoCurrentStory(cmd.conversation_id))?;

        let assignment =
            StoryAssignment::new(cmd.conversation_id, cmd.child_username, story.title)?;
        self.assignments.save(&assignment).await?;

        info!(
            conversation_id = %assignment.conversation_id,
            child = %assignment.child_username,
            "Story assigned"
        );
        Ok(assignment)
    }
}

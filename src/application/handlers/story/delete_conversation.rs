//! DeleteConversationHandler - Removes a conversation and everything under it.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{AccountId, ConversationId};
use crate::ports::MessageLog;

use super::access::{owned_conversation, ForeignAccess};
use super::errors::StoryTurnError;

/// Command to delete a conversation.
#[derive(Debug, Clone)]
pub struct DeleteConversationCommand {
    pub account_id: AccountId,
    pub conversation_id: ConversationId,
}

/// Handler for deleting conversations.
pub struct DeleteConversationHandler {
    log: Arc<dyn MessageLog>,
}

impl DeleteConversationHandler {
    pub fn new(log: Arc<dyn MessageLog>) -> Self {
        Self { log }
    }

    /// Deletes the conversation with its messages and story assignments.
    ///
    /// Unknown and foreign conversations are both `NotFound`.
    pub async fn handle(&self, cmd: DeleteConversationCommand) -> Result<(), StoryTurnError> {
        owned_conversation(
            self.log.as_ref(),
            &cmd.conversation_id,
            &cmd.account_id,
            ForeignAccess::NotFound,
        )
        .await?;

        self.log.delete(&cmd.conversation_id).await?;

        info!(conversation_id = %cmd.conversation_id, "Conversation deleted");
        Ok(())
    }
}

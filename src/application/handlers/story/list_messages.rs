//! ListMessagesHandler - A conversation's turns in log order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Message, Sender};
use crate::domain::foundation::{AccountId, ConversationId, MessageId, Timestamp};
use crate::ports::MessageLog;

use super::access::{owned_conversation, ForeignAccess};
use super::errors::StoryTurnError;

/// Query for a conversation's messages.
#[derive(Debug, Clone)]
pub struct ListMessagesQuery {
    pub account_id: AccountId,
    pub conversation_id: ConversationId,
}

/// A message as shown to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    pub id: MessageId,
    pub sender: Sender,
    pub content: String,
    /// Persisted intent code (0..=3).
    pub code: i16,
    pub created_at: Timestamp,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: *message.id(),
            sender: message.sender(),
            content: message.content().to_string(),
            code: message.intent().code(),
            created_at: *message.created_at(),
        }
    }
}

/// Handler for listing a conversation's messages.
pub struct ListMessagesHandler {
    log: Arc<dyn MessageLog>,
}

impl ListMessagesHandler {
    pub fn new(log: Arc<dyn MessageLog>) -> Self {
        Self { log }
    }

    /// Returns the messages oldest first.
    ///
    /// An unknown conversation is `NotFound`; someone else's is `AccessDenied`.
    pub async fn handle(
        &self,
        query: ListMessagesQuery,
    ) -> Result<Vec<MessageView>, StoryTurnError> {
        owned_conversation(
            self.log.as_ref(),
            &query.conversation_id,
            &query.account_id,
            ForeignAccess::Denied,
        )
        .await?;

        let messages = self.log.messages(&query.conversation_id).await?;
        Ok(messages.iter().map(MessageView::from).collect())
    }
}

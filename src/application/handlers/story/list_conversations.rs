//! ListConversationsHandler - An account's conversations, newest first.

use std::sync::Arc;

use crate::domain::foundation::AccountId;
use crate::ports::{ConversationSummary, MessageLog};

use super::errors::StoryTurnError;

/// Query for an account's conversations.
#[derive(Debug, Clone)]
pub struct ListConversationsQuery {
    pub account_id: AccountId,
}

/// Handler for listing conversations.
pub struct ListConversationsHandler {
    log: Arc<dyn MessageLog>,
}

impl ListConversationsHandler {
    pub fn new(log: Arc<dyn MessageLog>) -> Self {
        Self { log }
    }

    pub async fn handle(
        &self,
        query: ListConversationsQuery,
    ) -> Result<Vec<ConversationSummary>, StoryTurnError> {
        Ok(self.log.list_for_owner(&query.account_id).await?)
    }
}

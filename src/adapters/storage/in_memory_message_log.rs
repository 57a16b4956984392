//! In-Memory Message Log Adapter
//!
//! Stores conversations, messages and story assignments in memory.
//! Useful for testing and for the console driver when no database is
//! configured.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{
    preview_of, sort_into_log_order, Conversation, Message, StoryAssignment,
};
use crate::domain::foundation::{
    AccountId, ConversationId, DomainError, ErrorCode, OwnedByAccount,
};
use crate::ports::{ConversationSummary, MessageLog, StoryAssignmentRepository};

#[derive(Debug, Default)]
struct LogState {
    conversations: HashMap<ConversationId, Conversation>,
    messages: HashMap<ConversationId, Vec<Message>>,
    assignments: Vec<StoryAssignment>,
}

/// In-memory message log and assignment store.
///
/// One lock guards all three collections so that cascading deletes and the
/// atomic conversation start are single critical sections.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageLog {
    state: Arc<RwLock<LogState>>,
}

impl InMemoryMessageLog {
    /// Create a new, empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored conversations
    pub async fn conversation_count(&self) -> usize {
        self.state.read().await.conversations.len()
    }

    /// Get the number of messages stored for a conversation
    pub async fn message_count(&self, id: &ConversationId) -> usize {
        self.state
            .read()
            .await
            .messages
            .get(id)
            .map_or(0, Vec::len)
    }
}

fn not_found(id: &ConversationId) -> DomainError {
    DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
        .with_detail("conversation_id", id.to_string())
}

#[async_trait]
impl MessageLog for InMemoryMessageLog {
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

        let mut state = self.state.write().await;
        state
            .conversations
            .insert(*conversation.id(), conversation.clone());
        state
            .messages
            .insert(*conversation.id(), vec![first.clone()]);
        Ok(())
    }

    async fn find_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, DomainError> {
        Ok(self.state.read().await.conversations.get(id).cloned())
    }

    async fn append(&self, message: &Message) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let id = message.conversation_id();
        if !state.conversations.contains_key(id) {
            return Err(not_found(id));
        }

        let log = state.messages.entry(*id).or_default();
        log.push(message.clone());
        sort_into_log_order(log);
        Ok(())
    }

    async fn messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .messages
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_for_owner(
        &self,
        owner: &AccountId,
    ) -> Result<Vec<ConversationSummary>, DomainError> {
        let state = self.state.read().await;

        let mut summaries: Vec<ConversationSummary> = state
            .conversations
            .values()
            .filter(|conversation| conversation.is_owned_by(owner))
            .map(|conversation| {
                let messages = state
                    .messages
                    .get(conversation.id())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let preview = messages
                    .iter()
                    .find(|m| m.is_user())
                    .map(|m| preview_of(m.content()))
                    .unwrap_or_default();

                ConversationSummary {
                    id: *conversation.id(),
                    created_at: *conversation.created_at(),
                    preview,
                    message_count: messages.len() as u32,
                }
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.to_string().cmp(&a.id.to_string()))
        });
        Ok(summaries)
    }

    async fn delete(&self, id: &ConversationId) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.conversations.remove(id).is_none() {
            return Err(not_found(id));
        }
        state.messages.remove(id);
        state.assignments.retain(|a| a.conversation_id != *id);
        Ok(())
    }
}

#[async_trait]
impl StoryAssignmentRepository for InMemoryMessageLog {
    async fn save(&self, assignment: &StoryAssignment) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.conversations.contains_key(&assignment.conversation_id) {
            return Err(not_found(&assignment.conversation_id));
        }
        state.assignments.push(assignment.clone());
        Ok(())
    }

    async fn for_child(&self, child_username: &str) -> Result<Vec<StoryAssignment>, DomainError> {
        let state = self.state.read().await;
        let mut found: Vec<StoryAssignment> = state
            .assignments
            .iter()
            .filter(|a| a.child_username == child_username)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.assigned_at.cmp(&a.assigned_at));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::story::Intent;

    fn account(id: &str) -> AccountId {
        AccountId::new(id).unwrap()
    }

    async fn started(log: &InMemoryMessageLog, owner: &str, text: &str) -> Conversation {
        let conversation = Conversation::start(account(owner));
        let first = Message::user(*conversation.id(), Intent::NewStory, text).unwrap();
        log.create_with_message(&conversation, &first).await.unwrap();
        conversation
    }

    #[tokio::test]
    async fn create_with_message_stores_both() {
        let log = InMemoryMessageLog::new();
        let conversation = started(&log, "parent", "a fox story").await;

        assert_eq!(log.conversation_count().await, 1);
        assert_eq!(log.message_count(conversation.id()).await, 1);
        assert_eq!(
            log.find_conversation(conversation.id()).await.unwrap(),
            Some(conversation)
        );
    }

    #[tokio::test]
    async fn create_with_message_rejects_foreign_message() {
        let log = InMemoryMessageLog::new();
        let conversation = Conversation::start(account("parent"));
        let stray = Message::user(ConversationId::new(), Intent::NewStory, "x").unwrap();

        assert!(log.create_with_message(&conversation, &stray).await.is_err());
        assert_eq!(log.conversation_count().await, 0);
    }

    #[tokio::test]
    async fn append_keeps_log_order() {
        let log = InMemoryMessageLog::new();
        let conversation = started(&log, "parent", "first").await;
        let id = *conversation.id();

        log.append(&Message::model(id, Intent::NewStory, "second").unwrap())
            .await
            .unwrap();
        log.append(&Message::user(id, Intent::Extend, "third").unwrap())
            .await
            .unwrap();

        let contents: Vec<String> = log
            .messages(&id)
            .await
            .unwrap()
            .iter()
            .map(|m| m.content().to_string())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn append_to_unknown_conversation_fails() {
        let log = InMemoryMessageLog::new();
        let message = Message::user(ConversationId::new(), Intent::OffTopic, "hi").unwrap();

        let err = log.append(&message).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConversationNotFound);
    }

    #[tokio::test]
    async fn list_for_owner_filters_and_previews() {
        let log = InMemoryMessageLog::new();
        let mine = started(&log, "parent", "a story about a brave mouse").await;
        started(&log, "other", "not mine").await;

        let summaries = log.list_for_owner(&account("parent")).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, *mine.id());
        assert_eq!(summaries[0].preview, "a story about a brave mouse");
        assert_eq!(summaries[0].message_count, 1);
    }

    #[tokio::test]
    async fn delete_cascades_to_messages_and_assignments() {
        let log = InMemoryMessageLog::new();
        let conversation = started(&log, "parent", "a fox story").await;
        let id = *conversation.id();
        let assignment = StoryAssignment::new(id, "lily", "Fox").unwrap();
        log.save(&assignment).await.unwrap();

        log.delete(&id).await.unwrap();

        assert_eq!(log.conversation_count().await, 0);
        assert!(log.messages(&id).await.unwrap().is_empty());
        assert!(log.for_child("lily").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_conversation_fails() {
        let log = InMemoryMessageLog::new();
        let err = log.delete(&ConversationId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConversationNotFound);
    }

    #[tokio::test]
    async fn assignments_are_scoped_to_child() {
        let log = InMemoryMessageLog::new();
        let conversation = started(&log, "parent", "a fox story").await;
        let id = *conversation.id();
        log.save(&StoryAssignment::new(id, "lily", "Fox").unwrap())
            .await
            .unwrap();
        log.save(&StoryAssignment::new(id, "sam", "Fox").unwrap())
            .await
            .unwrap();

        let lily = log.for_child("lily").await.unwrap();
        assert_eq!(lily.len(), 1);
        assert_eq!(lily[0].child_username, "lily");
    }
}

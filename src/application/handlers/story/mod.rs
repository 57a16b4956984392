//! Storytelling command and query handlers.
//!
//! `RouteTurnHandler` is the per-turn state machine; `ConfirmNewStoryHandler`
//! completes the new-story handshake it can ask for. The remaining handlers
//! list, delete and assign.

mod access;
mod assign_story;
mod confirm_new_story;
mod delete_conversation;
mod errors;
mod list_assignments;
mod list_conversations;
mod list_messages;
pub mod replies;
mod route_turn;

pub use assign_story::{AssignStoryCommand, AssignStoryHandler};
pub use confirm_new_story::{ConfirmNewStoryCommand, ConfirmNewStoryHandler, ConfirmNewStoryResult};
pub use delete_conversation::{DeleteConversationCommand, DeleteConversationHandler};
pub use errors::StoryTurnError;
pub use list_assignments::{ListAssignmentsHandler, ListAssignmentsQuery};
pub use list_conversations::{ListConversationsHandler, ListConversationsQuery};
pub use list_messages::{ListMessagesHandler, ListMessagesQuery, MessageView};
pub use route_turn::{RouteTurnCommand, RouteTurnHandler, RouteTurnResult};

#[cfg(test)]
mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::adapters::ai::MockBackend;
    use crate::adapters::storage::InMemoryMessageLog;
    use crate::application::services::{GenerationSettings, IntentClassifier, StoryGenerator};
    use crate::domain::conversation::{Conversation, Message};
    use crate::domain::foundation::{AccountId, ConversationId, DomainError};
    use crate::domain::story::{Intent, StorySnapshot};
    use crate::ports::{ConversationSummary, MessageLog};

    use super::{ConfirmNewStoryHandler, RouteTurnHandler};

    pub fn account(id: &str) -> AccountId {
        AccountId::new(id).unwrap()
    }

    fn generator(backend: &Arc<MockBackend>) -> StoryGenerator {
        StoryGenerator::new(backend.clone(), GenerationSettings::default())
    }

    pub fn handlers(
        log: &InMemoryMessageLog,
        backend: MockBackend,
    ) -> (RouteTurnHandler, Arc<MockBackend>) {
        let backend = Arc::new(backend);
        let handler = RouteTurnHandler::new(
            Arc::new(log.clone()),
            IntentClassifier::new(backend.clone()),
            generator(&backend),
        );
        (handler, backend)
    }

    pub fn confirm_handler(
        log: &InMemoryMessageLog,
        backend: MockBackend,
    ) -> (ConfirmNewStoryHandler, Arc<MockBackend>) {
        let backend = Arc::new(backend);
        let handler = ConfirmNewStoryHandler::new(Arc::new(log.clone()), generator(&backend));
        (handler, backend)
    }

    /// Stores a conversation holding one request and one generated story.
    pub async fn seeded_story(
        log: &InMemoryMessageLog,
        owner: &str,
        title: &str,
        body: &str,
    ) -> ConversationId {
        let conversation = Conversation::start(account(owner));
        let id = *conversation.id();
        let request = Message::user(id, Intent::NewStory, format!("Tell me a story called {title}"))
            .unwrap();
        log.create_with_message(&conversation, &request).await.unwrap();

        let story = StorySnapshot::new(title, body).render();
        log.append(&Message::model(id, Intent::NewStory, story).unwrap())
            .await
            .unwrap();
        id
    }

    /// Log whose conversations disappear right after they are looked up,
    /// as when another request deletes them concurrently.
    pub struct VanishingLog(pub InMemoryMessageLog);

    #[async_trait]
    impl MessageLog for VanishingLog {
        async fn create_with_message(
            &self,
            conversation: &Conversation,
            first: &Message,
        ) -> Result<(), DomainError> {
            self.0.create_with_message(conversation, first).await
        }

        async fn find_conversation(
            &self,
            id: &ConversationId,
        ) -> Result<Option<Conversation>, DomainError> {
            let found = self.0.find_conversation(id).await?;
            if found.is_some() {
                self.0.delete(id).await?;
            }
            Ok(found)
        }

        async fn append(&self, message: &Message) -> Result<(), DomainError> {
            self.0.append(message).await
        }

        async fn messages(&self, id: &ConversationId) -> Result<Vec<Message>, DomainError> {
            self.0.messages(id).await
        }

        async fn list_for_owner(
            &self,
            owner: &AccountId,
        ) -> Result<Vec<ConversationSummary>, DomainError> {
            self.0.list_for_owner(owner).await
        }

        async fn delete(&self, id: &ConversationId) -> Result<(), DomainError> {
            self.0.delete(id).await
        }
    }
}

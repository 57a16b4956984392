//! RouteTurnHandler - Routes one user turn by its classified intent.
//!
//! Per turn: validate, resolve the conversation, classify, apply the
//! new-story confirmation gate, log the user turn, then dispatch on intent.
//! Nothing is written when validation, lookup or classification fails. A
//! backend failure after the user turn was logged leaves that turn in place.

use std::sync::Arc;

use tracing::info;

use crate::application::services::{IntentClassifier, StoryGenerator};
use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::{AccountId, ConversationId};
use crate::domain::story::{extract_current_story, Intent, CONTINUED_STORY_TITLE};
use crate::ports::MessageLog;

use super::access::{owned_conversation, tell_new_story, ForeignAccess};
use super::errors::StoryTurnError;
use super::replies::{CONFIRM_NEW_STORY_PROMPT, NO_STORY_REPLY, OFF_TOPIC_REPLY, UNSAFE_REPLY};

/// Command to route one user turn.
#[derive(Debug, Clone)]
pub struct RouteTurnCommand {
    pub account_id: AccountId,
    pub text: String,
    /// Conversation to continue; `None` starts a new one.
    pub conversation_id: Option<ConversationId>,
}

impl RouteTurnCommand {
    /// Creates a command for a turn in a fresh conversation.
    pub fn new(account_id: AccountId, text: impl Into<String>) -> Self {
        Self {
            account_id,
            text: text.into(),
            conversation_id: None,
        }
    }

    /// Continues an existing conversation.
    pub fn in_conversation(mut self, conversation_id: ConversationId) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }
}

/// Outcome of a routed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTurnResult {
    /// The turn was handled; `reply` is shown to the user.
    Reply {
        reply: String,
        conversation_id: ConversationId,
    },
    /// A new story was requested inside an existing conversation. Nothing was
    /// written; the caller must ask and then use `ConfirmNewStoryHandler`.
    ConfirmationRequired {
        prompt: String,
        conversation_id: ConversationId,
    },
}

impl RouteTurnResult {
    /// The conversation this result refers to.
    pub fn conversation_id(&self) -> ConversationId {
        match self {
            RouteTurnResult::Reply { conversation_id, .. }
            | RouteTurnResult::ConfirmationRequired { conversation_id, .. } => *conversation_id,
        }
    }
}

/// Handler for routing user turns.
pub struct RouteTurnHandler {
    log: Arc<dyn MessageLog>,
    classifier: IntentClassifier,
    generator: StoryGenerator,
}

impl RouteTurnHandler {
    pub fn new(
        log: Arc<dyn MessageLog>,
        classifier: IntentClassifier,
        generator: StoryGenerator,
    ) -> Self {
        Self {
            log,
            classifier,
            generator,
        }
    }

    pub async fn handle(&self, cmd: RouteTurnCommand) -> Result<RouteTurnResult, StoryTurnError> {
        // 1. Validate
        let text = cmd.text.trim();
        if text.is_empty() {
            return Err(StoryTurnError::empty_text());
        }

        // 2. Resolve conversation
        let existing = match cmd.conversation_id {
            Some(id) => Some(
                owned_conversation(self.log.as_ref(), &id, &cmd.account_id, ForeignAccess::NotFound)
                    .await?,
            ),
            None => None,
        };

        // 3. Classify
        let intent = self.classifier.classify(text).await?;

        // 4. Confirmation gate
        if let (Intent::NewStory, Some(conversation)) = (intent, &existing) {
            info!(
                conversation_id = %conversation.id(),
                "New story requested in existing conversation, asking for confirmation"
            );
            return Ok(RouteTurnResult::ConfirmationRequired {
                prompt: CONFIRM_NEW_STORY_PROMPT.to_string(),
                conversation_id: *conversation.id(),
            });
        }

        // 5. Log the user turn
        let conversation_id = match existing {
            Some(conversation) => {
                let id = *conversation.id();
                self.log
                    .append(&Message::user(id, intent, cmd.text.as_str())?)
                    .await?;
                id
            }
            None => {
                let conversation = Conversation::start(cmd.account_id.clone());
                let first = Message::user(*conversation.id(), intent, cmd.text.as_str())?;
                self.log.create_with_message(&conversation, &first).await?;
                *conversation.id()
            }
        };

        // 6. Dispatch
        let reply = match intent {
            Intent::OffTopic => OFF_TOPIC_REPLY.to_string(),
            Intent::Unsafe => UNSAFE_REPLY.to_string(),
            Intent::NewStory => {
                tell_new_story(&self.generator, self.log.as_ref(), conversation_id, text).await?
            }
            Intent::Extend => self.extend(conversation_id, text).await?,
        };

        info!(
            conversation_id = %conversation_id,
            intent = ?intent,
            "Routed user turn"
        );

        Ok(RouteTurnResult::Reply {
            reply,
            conversation_id,
        })
    }

    async fn extend(
        &self,
        conversation_id: ConversationId,
        request: &str,
    ) -> Result<String, StoryTurnError> {
        let history = self.log.messages(&conversation_id).await?;
        let Some(current) = extract_current_story(&history, CONTINUED_STORY_TITLE) else {
            return Ok(NO_STORY_REPLY.to_string());
        };

        let story = self
            .generator
            .extend_story(&current.title, &current.body, request)
            .await?;
        let reply = story.render();
        self.log
            .append(&Message::model(conversation_id, Intent::Extend, reply.as_str())?)
            .await?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockBackend;
    use crate::adapters::storage::InMemoryMessageLog;
    use crate::domain::conversation::Sender;
    use crate::domain::foundation::ErrorCode;
    use crate::ports::BackendError;

    use super::super::test_support::{account, handlers, seeded_story, VanishingLog};

    mod fresh_conversation {
        use super::*;

        #[tokio::test]
        async fn off_topic_logs_only_the_user_turn() {
            let log = InMemoryMessageLog::new();
            let (router, _) = handlers(&log, MockBackend::new().with_classification("0"));

            let result = router
                .handle(RouteTurnCommand::new(account("parent"), "What is 2+2?"))
                .await
                .unwrap();

            let RouteTurnResult::Reply { reply, conversation_id } = result else {
                panic!("expected a reply");
            };
            assert_eq!(reply, OFF_TOPIC_REPLY);
            assert_eq!(log.conversation_count().await, 1);

            let messages = log.messages(&conversation_id).await.unwrap();
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].sender(), Sender::User);
            assert_eq!(messages[0].intent(), Intent::OffTopic);
        }

        #[tokio::test]
        async fn unsafe_logs_only_the_user_turn() {
            let log = InMemoryMessageLog::new();
            let (router, _) = handlers(&log, MockBackend::new().with_classification("1"));

            let result = router
                .handle(RouteTurnCommand::new(account("parent"), "a scary gory story"))
                .await
                .unwrap();

            assert!(matches!(
                &result,
                RouteTurnResult::Reply { reply, .. } if reply == UNSAFE_REPLY
            ));
            assert_eq!(log.message_count(&result.conversation_id()).await, 1);
        }

        #[tokio::test]
        async fn new_story_logs_user_and_model_turns() {
            // Given
            let log = InMemoryMessageLog::new();
            let backend = MockBackend::new()
                .with_classification("2")
                .with_story("TITLE: The Brave Mouse\n\nSTORY: Squeak faced the cat.");
            let (router, _) = handlers(&log, backend);

            // When
            let result = router
                .handle(RouteTurnCommand::new(
                    account("parent"),
                    "Tell me a story about a brave mouse",
                ))
                .await
                .unwrap();

            // Then
            let RouteTurnResult::Reply { reply, conversation_id } = result else {
                panic!("expected a reply");
            };
            assert_eq!(reply, "TITLE: The Brave Mouse\n\nSTORY: Squeak faced the cat.");

            let messages = log.messages(&conversation_id).await.unwrap();
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[0].content(), "Tell me a story about a brave mouse");
            assert_eq!(messages[1].sender(), Sender::Model);
            assert_eq!(messages[1].intent(), Intent::NewStory);
            assert_eq!(messages[1].content(), reply);
        }

        #[tokio::test]
        async fn extend_without_story_sends_notice() {
            let log = InMemoryMessageLog::new();
            let (router, _) = handlers(&log, MockBackend::new().with_classification("3"));

            let result = router
                .handle(RouteTurnCommand::new(account("parent"), "and then?"))
                .await
                .unwrap();

            let RouteTurnResult::Reply { reply, conversation_id } = result else {
                panic!("expected a reply");
            };
            assert_eq!(reply, NO_STORY_REPLY);
            assert_eq!(log.message_count(&conversation_id).await, 1);
        }
    }

    mod existing_conversation {
        use super::*;

        #[tokio::test]
        async fn new_story_requires_confirmation_and_writes_nothing() {
            let log = InMemoryMessageLog::new();
            let id = seeded_story(&log, "parent", "Fox", "The fox ran.").await;
            let before = log.message_count(&id).await;
            let backend = MockBackend::new().with_classification("2");
            let (router, backend) = handlers(&log, backend);

            let result = router
                .handle(
                    RouteTurnCommand::new(account("parent"), "A story about a whale")
                        .in_conversation(id),
                )
                .await
                .unwrap();

            assert_eq!(
                result,
                RouteTurnResult::ConfirmationRequired {
                    prompt: CONFIRM_NEW_STORY_PROMPT.to_string(),
                    conversation_id: id,
                }
            );
            assert_eq!(log.message_count(&id).await, before);
            assert!(backend.write_calls().is_empty());
        }

        #[tokio::test]
        async fn extend_rewrites_current_story() {
            let log = InMemoryMessageLog::new();
            let id = seeded_story(&log, "parent", "Fox", "The fox ran.").await;
            let backend = MockBackend::new()
                .with_classification("3")
                .with_story("TITLE: Fox\n\nSTORY: The fox ran into the snow.");
            let (router, backend) = handlers(&log, backend);

            let result = router
                .handle(
                    RouteTurnCommand::new(account("parent"), "make it snow").in_conversation(id),
                )
                .await
                .unwrap();

            assert_eq!(result.conversation_id(), id);
            let calls = backend.write_calls();
            assert!(calls[0].user_text.contains("STORY: The fox ran."));

            let messages = log.messages(&id).await.unwrap();
            let last = messages.last().unwrap();
            assert_eq!(last.intent(), Intent::Extend);
            assert_eq!(last.content(), "TITLE: Fox\n\nSTORY: The fox ran into the snow.");
        }

        #[tokio::test]
        async fn foreign_conversation_is_not_found() {
            let log = InMemoryMessageLog::new();
            let id = seeded_story(&log, "parent", "Fox", "The fox ran.").await;
            let (router, backend) = handlers(&log, MockBackend::new().with_classification("3"));

            let err = router
                .handle(RouteTurnCommand::new(account("stranger"), "more").in_conversation(id))
                .await
                .unwrap_err();

            assert_eq!(err.error_code(), ErrorCode::ConversationNotFound);
            assert_eq!(backend.call_count(), 0);
        }

        #[tokio::test]
        async fn unknown_conversation_is_not_found() {
            let log = InMemoryMessageLog::new();
            let (router, _) = handlers(&log, MockBackend::new());

            let err = router
                .handle(
                    RouteTurnCommand::new(account("parent"), "more")
                        .in_conversation(ConversationId::new()),
                )
                .await
                .unwrap_err();

            assert!(matches!(err, StoryTurnError::NotFound(_)));
        }
    }

    mod failures {
        use super::*;

        #[tokio::test]
        async fn empty_text_is_rejected_before_any_call() {
            let log = InMemoryMessageLog::new();
            let (router, backend) = handlers(&log, MockBackend::new());

            let err = router
                .handle(RouteTurnCommand::new(account("parent"), "   "))
                .await
                .unwrap_err();

            assert!(matches!(err, StoryTurnError::Validation(_)));
            assert_eq!(backend.call_count(), 0);
            assert_eq!(log.conversation_count().await, 0);
        }

        #[tokio::test]
        async fn reserved_code_aborts_without_writing() {
            let log = InMemoryMessageLog::new();
            let (router, _) = handlers(&log, MockBackend::new().with_classification("4"));

            let err = router
                .handle(RouteTurnCommand::new(account("parent"), "hmm"))
                .await
                .unwrap_err();

            assert_eq!(err.error_code(), ErrorCode::ClassificationFailed);
            assert_eq!(log.conversation_count().await, 0);
        }

        #[tokio::test]
        async fn generation_failure_keeps_the_user_turn() {
            let log = InMemoryMessageLog::new();
            let backend = MockBackend::new()
                .with_classification("2")
                .with_write_error(BackendError::unavailable("down"));
            let (router, _) = handlers(&log, backend);

            let err = router
                .handle(RouteTurnCommand::new(account("parent"), "a story about a fox"))
                .await
                .unwrap_err();

            assert_eq!(err.error_code(), ErrorCode::GenerationUnavailable);
            let summaries = log.list_for_owner(&account("parent")).await.unwrap();
            assert_eq!(summaries.len(), 1);
            assert_eq!(summaries[0].message_count, 1);
        }

        #[tokio::test]
        async fn conversation_deleted_mid_turn_is_not_found() {
            let log = InMemoryMessageLog::new();
            let id = seeded_story(&log, "parent", "Fox", "The fox ran.").await;
            let backend = Arc::new(MockBackend::new().with_classification("3"));
            let router = RouteTurnHandler::new(
                Arc::new(VanishingLog(log.clone())),
                IntentClassifier::new(backend.clone()),
                StoryGenerator::new(
                    backend,
                    crate::application::services::GenerationSettings::default(),
                ),
            );

            let cmd =
                RouteTurnCommand::new(account("parent"), "make it longer").in_conversation(id);
            let err = router.handle(cmd).await.unwrap_err();

            assert!(matches!(err, StoryTurnError::NotFound(found) if found == id));
            assert_eq!(log.conversation_count().await, 0);
        }
    }
}

//! ConfirmNewStoryHandler - Second half of the new-story handshake.
//!
//! Runs after `RouteTurnHandler` answered with a confirmation request. A `y`
//! always starts a brand-new conversation; the referenced one is left as it
//! is. An `n` changes nothing.

use std::sync::Arc;

use tracing::info;

use crate::application::services::StoryGenerator;
use crate::domain::conversation::{Confirmation, Conversation, Message};
use crate::domain::foundation::{AccountId, ConversationId};
use crate::domain::story::Intent;
use crate::ports::MessageLog;

use super::access::{owned_conversation, tell_new_story, ForeignAccess};
use super::errors::StoryTurnError;
use super::replies::CANCELLED_REPLY;

/// Command answering a new-story confirmation prompt.
#[derive(Debug, Clone)]
pub struct ConfirmNewStoryCommand {
    pub account_id: AccountId,
    /// The story request that triggered the prompt.
    pub text: String,
    /// Raw answer, expected to be `y` or `n`.
    pub confirmation: String,
    /// Conversation named in the prompt.
    pub conversation_id: Option<ConversationId>,
}

/// Outcome of a confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmNewStoryResult {
    /// A new conversation was started with a fresh story.
    Started {
        reply: String,
        conversation_id: ConversationId,
    },
    /// The user declined; nothing changed.
    Cancelled { message: String },
}

/// Handler for new-story confirmations.
pub struct ConfirmNewStoryHandler {
    log: Arc<dyn MessageLog>,
    generator: StoryGenerator,
}

impl ConfirmNewStoryHandler {
    pub fn new(log: Arc<dyn MessageLog>, generator: StoryGenerator) -> Self {
        Self { log, generator }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmNewStoryCommand,
    ) -> Result<ConfirmNewStoryResult, StoryTurnError> {
        let confirmation = cmd
            .confirmation
            .parse::<Confirmation>()
            .map_err(|e| StoryTurnError::InvalidConfirmation(e.to_string()))?;

        if let Some(id) = cmd.conversation_id {
            owned_conversation(self.log.as_ref(), &id, &cmd.account_id, ForeignAccess::NotFound)
                .await?;
        }

        if confirmation == Confirmation::No {
            return Ok(ConfirmNewStoryResult::Cancelled {
                message: CANCELLED_REPLY.to_string(),
            });
        }

        let text = cmd.text.trim();
        if text.is_empty() {
            return Err(StoryTurnError::empty_text());
        }

        let conversation = Conversation::start(cmd.account_id.clone());
        let conversation_id = *conversation.id();
        let first = Message::user(conversation_id, Intent::NewStory, cmd.text.as_str())?;
        self.log.create_with_message(&conversation, &first).await?;

        let reply =
            tell_new_story(&self.generator, self.log.as_ref(), conversation_id, text).await?;

        info!(
            conversation_id = %conversation_id,
            abandoned = ?cmd.conversation_id,
            "Started new story after confirmation"
        );

        Ok(ConfirmNewStoryResult::Started {
            reply,
            conversation_id,
        })
    }
}

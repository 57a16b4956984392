//! Conversation lookup shared by the handlers.

use crate::application::services::StoryGenerator;
use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::{AccountId, ConversationId, OwnedByAccount};
use crate::domain::story::Intent;
use crate::ports::MessageLog;

use super::errors::StoryTurnError;

/// How a conversation owned by someone else is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ForeignAccess {
    /// Indistinguishable from an unknown id.
    NotFound,
    /// Reported as an access violation.
    Denied,
}

/// Loads a conversation and checks that `account` owns it.
pub(super) async fn owned_conversation(
    log: &dyn MessageLog,
    id: &ConversationId,
    account: &AccountId,
    foreign: ForeignAccess,
) -> Result<Conversation, StoryTurnError> {
    let conversation = log
        .find_conversation(id)
        .await?
        .ok_or(StoryTurnError::NotFound(*id))?;

    if conversation.check_ownership(account).is_err() {
        return Err(match foreign {
            ForeignAccess::NotFound => StoryTurnError::NotFound(*id),
            ForeignAccess::Denied => StoryTurnError::AccessDenied(*id),
        });
    }

    Ok(conversation)
}

/// Writes a brand-new story for `prompt`, logs it as a model turn and returns
/// the rendered reply.
pub(super) async fn tell_new_story(
    generator: &StoryGenerator,
    log: &dyn MessageLog,
    conversation_id: ConversationId,
    prompt: &str,
) -> Result<String, StoryTurnError> {
    let story = generator.generate_new_story(prompt).await?;
    let reply = story.render();
    log.append(&Message::model(conversation_id, Intent::NewStory, reply.as_str())?)
        .await?;
    Ok(reply)
}

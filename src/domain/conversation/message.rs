//! Message entity for conversations.
//!
//! Messages are immutable records of one turn in a conversation. The log is
//! append-only: once written a message is never edited, only removed together
//! with its conversation.

use crate::domain::foundation::{ConversationId, DomainError, MessageId, Timestamp};
use crate::domain::story::Intent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sender {
    /// The person talking to the assistant.
    User,
    /// The storytelling model.
    Model,
}

impl Sender {
    /// Returns the persisted label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "USER",
            Sender::Model => "MODEL",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Sender::User),
            "MODEL" => Ok(Sender::Model),
            other => Err(DomainError::validation(
                "sender",
                format!("Unknown sender: {}", other),
            )),
        }
    }
}

/// An immutable turn within a conversation.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `content` is non-empty (validated at construction)
/// - `created_at` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    conversation_id: ConversationId,
    sender: Sender,
    intent: Intent,
    content: String,
    created_at: Timestamp,
}

impl Message {
    /// Creates a new message.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn new(
        conversation_id: ConversationId,
        sender: Sender,
        intent: Intent,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let content = content.into();
        Self::validate_content(&content)?;

        Ok(Self {
            id: MessageId::new(),
            conversation_id,
            sender,
            intent,
            content,
            created_at: Timestamp::now(),
        })
    }

    /// Creates a user turn.
    pub fn user(
        conversation_id: ConversationId,
        intent: Intent,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::new(conversation_id, Sender::User, intent, content)
    }

    /// Creates a model turn.
    pub fn model(
        conversation_id: ConversationId,
        intent: Intent,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::new(conversation_id, Sender::Model, intent, content)
    }

    /// Reconstitutes a message from persistence (no validation).
    pub fn reconstitute(
        id: MessageId,
        conversation_id: ConversationId,
        sender: Sender,
        intent: Intent,
        content: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            conversation_id,
            sender,
            intent,
            content,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true if this message was written by the user.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Returns true if this is a model turn that carries a story.
    pub fn is_story(&self) -> bool {
        self.sender == Sender::Model && self.intent.carries_story()
    }

    /// Ordering key within a conversation: creation time, then id.
    pub fn log_order(&self) -> (Timestamp, MessageId) {
        (self.created_at, self.id)
    }

    fn validate_content(content: &str) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::validation(
                "content",
                "Message content cannot be empty",
            ));
        }
        Ok(())
    }
}

/// Sorts a conversation's messages into log order (oldest first).
pub fn sort_into_log_order(messages: &mut [Message]) {
    messages.sort_by_key(Message::log_order);
}

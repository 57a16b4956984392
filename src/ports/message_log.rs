//! Message log port.
//!
//! The message log is the only shared mutable resource of the storytelling
//! core: conversations and their append-only turns. All cross-request state
//! lives here.
//!
//! # Design
//!
//! - **Append-only**: messages are inserted, never updated
//! - **Ordered reads**: a conversation's messages come back by `created_at`,
//!   ties broken by message id
//! - **Atomic start**: a conversation and its first message are written as one
//!   unit
//! - **Cascading delete**: removing a conversation removes its messages and
//!   any story assignments made from it

use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::{AccountId, ConversationId, DomainError, Timestamp};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for conversation and message persistence.
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Stores a new conversation together with its first message.
    ///
    /// Either both are written or neither is.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the message belongs to another conversation
    /// - `DatabaseError` on persistence failure
    async fn create_with_message(
        &self,
        conversation: &Conversation,
        first: &Message,
    ) -> Result<(), DomainError>;

    /// Find a conversation by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, DomainError>;

    /// Appends a message to its conversation.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the conversation doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn append(&self, message: &Message) -> Result<(), DomainError>;

    /// Returns a conversation's messages, oldest first.
    ///
    /// An unknown conversation yields an empty list.
    async fn messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>, DomainError>;

    /// Lists an account's conversations, newest first.
    async fn list_for_owner(&self, owner: &AccountId)
        -> Result<Vec<ConversationSummary>, DomainError>;

    /// Deletes a conversation with everything that hangs off it.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if conversation doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &ConversationId) -> Result<(), DomainError>;
}

/// One row of a conversation listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub created_at: Timestamp,
    /// First user message, shortened for display. Empty if there is none.
    pub preview: String,
    pub message_count: u32,
}

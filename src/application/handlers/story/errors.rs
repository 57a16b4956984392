//! Errors surfaced by the storytelling handlers.

use thiserror::Error;

use crate::application::services::ClassifyError;
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, ValidationError};
use crate::ports::BackendError;

/// Failure of a storytelling operation.
///
/// Every variant maps onto a stable [`ErrorCode`] via [`StoryTurnError::error_code`];
/// the transport layer chooses status codes from that.
#[derive(Debug, Clone, Error)]
pub enum StoryTurnError {
    /// Missing or empty required input. Nothing was written.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The conversation exists but belongs to another account.
    #[error("Access denied to conversation {0}")]
    AccessDenied(ConversationId),

    /// The conversation does not resolve for this account.
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    /// The classifier answer could not be turned into an intent.
    #[error("Classification failed: {0}")]
    Classification(String),

    /// The generation backend call failed.
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// Confirmation answer was neither `y` nor `n`.
    #[error("Invalid confirmation: {0}")]
    InvalidConfirmation(String),

    /// The conversation has no story yet.
    #[error("Conversation {0} has no story yet")]
    NoCurrentStory(ConversationId),

    /// Persistence failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoryTurnError {
    /// Returns the stable error code for this failure.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            StoryTurnError::Validation(_) => ErrorCode::ValidationFailed,
            StoryTurnError::AccessDenied(_) => ErrorCode::Forbidden,
            StoryTurnError::NotFound(_) => ErrorCode::ConversationNotFound,
            StoryTurnError::Classification(_) => ErrorCode::ClassificationFailed,
            StoryTurnError::GenerationUnavailable(_) => ErrorCode::GenerationUnavailable,
            StoryTurnError::InvalidConfirmation(_) => ErrorCode::InvalidConfirmation,
            StoryTurnError::NoCurrentStory(_) => ErrorCode::NoCurrentStory,
            StoryTurnError::Storage(_) => ErrorCode::DatabaseError,
        }
    }

    pub(super) fn empty_text() -> Self {
        StoryTurnError::Validation("text cannot be empty".to_string())
    }
}

/// Reads the conversation id a store error was raised for.
fn conversation_in(err: &DomainError) -> Option<ConversationId> {
    err.details.get("conversation_id")?.parse().ok()
}

impl From<DomainError> for StoryTurnError {
    fn from(err: DomainError) -> Self {
        match (err.code, conversation_in(&err)) {
            (ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat, _) => {
                StoryTurnError::Validation(err.message)
            }
            (ErrorCode::ConversationNotFound, Some(id)) => StoryTurnError::NotFound(id),
            (ErrorCode::Forbidden, Some(id)) => StoryTurnError::AccessDenied(id),
            _ => StoryTurnError::Storage(err.to_string()),
        }
    }
}

impl From<ValidationError> for StoryTurnError {
    fn from(err: ValidationError) -> Self {
        StoryTurnError::Validation(err.to_string())
    }
}

impl From<ClassifyError> for StoryTurnError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::Backend(backend) => backend.into(),
            other => StoryTurnError::Classification(other.to_string()),
        }
    }
}

impl From<BackendError> for StoryTurnError {
    fn from(err: BackendError) -> Self {
        StoryTurnError::GenerationUnavailable(err.to_string())
    }
}

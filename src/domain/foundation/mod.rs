//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the storyteller domain.

mod errors;
mod ids;
mod ownership;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AccountId, AssignmentId, ConversationId, MessageId};
pub use ownership::OwnedByAccount;
pub use timestamp::Timestamp;

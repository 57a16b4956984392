//! Conversation domain module.
//!
//! Conversations, their append-only message log entries, the confirmation
//! answer used by the new-story handshake, and story assignments.

mod assignment;
mod confirmation;
mod conversation;
mod message;

pub use assignment::StoryAssignment;
pub use confirmation::Confirmation;
pub use conversation::{preview_of, Conversation, PREVIEW_CHARS};
pub use message::{sort_into_log_order, Message, Sender};

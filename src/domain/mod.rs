//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, ownership)
//! - `conversation` - Conversations, messages, confirmations and story assignments
//! - `story` - Intents, the story text format and current-story derivation

pub mod conversation;
pub mod foundation;
pub mod story;

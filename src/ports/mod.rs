//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `GenerationBackend` - Classification and story writing by an external model
//! - `MessageLog` - Conversations and their append-only turns
//! - `StoryAssignmentRepository` - Stories handed to child accounts

mod assignment_repository;
mod generation_backend;
mod message_log;

pub use assignment_repository::StoryAssignmentRepository;
pub use generation_backend::{BackendError, BackendInfo, GenerationBackend, WriteRequest};
pub use message_log::{ConversationSummary, MessageLog};

//! Storage Adapters
//!
//! ## Available Adapters
//!
//! - **InMemoryMessageLog** - Conversations, messages and assignments held in
//!   memory; implements both `MessageLog` and `StoryAssignmentRepository`
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryMessageLog;
//!
//! let log = InMemoryMessageLog::new();
//! let handler = ListAssignmentsHandler::new(Arc::new(log.clone()));
//! ```

mod in_memory_message_log;

pub use in_memory_message_log::InMemoryMessageLog;

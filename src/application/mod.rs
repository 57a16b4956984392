//! Application layer - Commands, Queries, Handlers and backend-facing services.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;
pub mod services;

pub use handlers::{
    AssignStoryCommand, AssignStoryHandler, ConfirmNewStoryCommand, ConfirmNewStoryHandler,
    ConfirmNewStoryResult, DeleteConversationCommand, DeleteConversationHandler,
    ListAssignmentsHandler, ListAssignmentsQuery, ListConversationsHandler,
    ListConversationsQuery, ListMessagesHandler, ListMessagesQuery, MessageView,
    RouteTurnCommand, RouteTurnHandler, RouteTurnResult, StoryTurnError,
};
pub use services::{
    ClassifyError, GenerationSettings, IntentClassifier, StoryGenerator, NEW_STORY_FALLBACK_TITLE,
};

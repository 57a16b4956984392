//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod story;

pub use story::{
    AssignStoryCommand, AssignStoryHandler, ConfirmNewStoryCommand, ConfirmNewStoryHandler,
    ConfirmNewStoryResult, DeleteConversationCommand, DeleteConversationHandler,
    ListAssignmentsHandler, ListAssignmentsQuery, ListConversationsHandler,
    ListConversationsQuery, ListMessagesHandler, ListMessagesQuery, MessageView,
    RouteTurnCommand, RouteTurnHandler, RouteTurnResult, StoryTurnError,
};

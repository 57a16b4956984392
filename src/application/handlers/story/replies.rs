//! Fixed replies sent without calling the generation backend.

/// Reply to a turn that is not about stories.
pub const OFF_TOPIC_REPLY: &str = "I don't think I can help with that.";

/// Reply to a story request that is not suitable for children.
pub const UNSAFE_REPLY: &str =
    "I'm sorry, but I can't tell that story. Let's think of a different one that is safe and fun for everyone!";

/// Reply to an extend request in a conversation without a story.
pub const NO_STORY_REPLY: &str =
    "There is no story here to continue yet. Ask me for a new story first!";

/// Question asked before starting a new story inside an existing conversation.
pub const CONFIRM_NEW_STORY_PROMPT: &str =
    "Starting a new story will leave the current one behind. Do you want to start a new story? (y/n)";

/// Reply when the user declines to start a new story.
pub const CANCELLED_REPLY: &str = "Okay, we'll keep going with the current story.";

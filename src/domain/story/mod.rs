//! Story domain module.
//!
//! Intents, the story text format and the derivation of a conversation's
//! current story from its history.

mod extractor;
mod intent;
pub mod prompts;
mod snapshot;

pub use extractor::{extract_current_story, StoryScan, CONTINUED_STORY_TITLE};
pub use intent::{Intent, UnknownIntentCode};
pub use snapshot::{
    parse_generated_story, parse_story_text, StorySnapshot, STORY_MARKER, TITLE_MARKER,
};

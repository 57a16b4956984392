//! Application services wrapping the generation backend.

mod intent_classifier;
mod story_generator;

pub use intent_classifier::{ClassifyError, IntentClassifier};
pub use story_generator::{GenerationSettings, StoryGenerator, NEW_STORY_FALLBACK_TITLE};

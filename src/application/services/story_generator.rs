//! Story Generator - writes and rewrites stories through the backend.
//!
//! Each operation is one backend call. Malformed output is not an error: the
//! raw text is kept as the body and a fallback title is used instead.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::story::{parse_generated_story, prompts, StorySnapshot};
use crate::ports::{BackendError, GenerationBackend, WriteRequest};

/// Title used when a freshly written story comes back without markers.
pub const NEW_STORY_FALLBACK_TITLE: &str = "New Story";

/// Knobs for the writing calls.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Upper bound on story length, stated in the instruction only.
    pub word_budget: u32,
    /// Maximum tokens the backend may generate per call.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            word_budget: 100,
            max_tokens: 600,
            temperature: 0.8,
        }
    }
}

/// Writes new stories and extends existing ones.
#[derive(Clone)]
pub struct StoryGenerator {
    backend: Arc<dyn GenerationBackend>,
    settings: GenerationSettings,
}

impl StoryGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>, settings: GenerationSettings) -> Self {
        Self { backend, settings }
    }

    /// Writes a brand-new story for `prompt`.
    pub async fn generate_new_story(&self, prompt: &str) -> Result<StorySnapshot, BackendError> {
        let instruction = prompts::new_story_instruction(self.settings.word_budget);
        let request = self.request(instruction, prompt);
        let raw = self.backend.write(request).await?;

        Ok(parse_generated_story(&raw).unwrap_or_else(|| {
            warn!(
                fallback_title = NEW_STORY_FALLBACK_TITLE,
                "Generated story is missing its title/story markers"
            );
            StorySnapshot::new(NEW_STORY_FALLBACK_TITLE, raw.trim())
        }))
    }

    /// Rewrites the story `existing_title`/`existing_body` to include
    /// `new_input`, keeping its title.
    pub async fn extend_story(
        &self,
        existing_title: &str,
        existing_body: &str,
        new_input: &str,
    ) -> Result<StorySnapshot, BackendError> {
        let input = prompts::extend_story_input(existing_title, existing_body, new_input);
        let instruction = prompts::extend_story_instruction(self.settings.word_budget);
        let request = self.request(instruction, input);
        let raw = self.backend.write(request).await?;

        Ok(parse_generated_story(&raw).unwrap_or_else(|| {
            warn!(
                fallback_title = existing_title,
                "Extended story is missing its title/story markers"
            );
            StorySnapshot::new(existing_title, raw.trim())
        }))
    }

    fn request(&self, instruction: String, user_text: impl Into<String>) -> WriteRequest {
        let info = self.backend.backend_info();
        debug!(backend = %info.name, model = %info.model, "Requesting story text");

        WriteRequest::new(instruction, user_text)
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature)
    }
}

//! Generation Backend Adapters.
//!
//! Implementations of the GenerationBackend port.
//!
//! ## Available Adapters
//!
//! - `MockBackend` - Scripted backend for testing
//! - `OpenAIBackend` - OpenAI-compatible chat completions (default model gpt-4o-mini)

mod mock_backend;
mod openai_backend;

pub use mock_backend::MockBackend;
pub use openai_backend::{OpenAIBackend, OpenAIConfig};

//! Generation Backend Port - Interface for the external text model.
//!
//! The storytelling core never interprets language itself. It asks the
//! backend for two things: a raw classification answer for a user turn, and
//! free text written under a system instruction. Both are opaque text-in /
//! text-out calls; turning their output into typed values is the job of the
//! application services that consume this port.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoBackend;
//!
//! #[async_trait]
//! impl GenerationBackend for EchoBackend {
//!     async fn classify(&self, _text: &str) -> Result<String, BackendError> {
//!         Ok("2".to_string())
//!     }
//!
//!     async fn write(&self, request: WriteRequest) -> Result<String, BackendError> {
//!         Ok(format!("TITLE: Echo\n\nSTORY: {}", request.user_text))
//!     }
//!
//!     fn backend_info(&self) -> BackendInfo {
//!         BackendInfo::new("echo", "echo-1")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for the generative text backend.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Asks the backend to classify `text`, returning its raw answer.
    ///
    /// The answer is expected to be an integer intent code but is not
    /// checked here.
    async fn classify(&self, text: &str) -> Result<String, BackendError>;

    /// Asks the backend to write text under a system instruction.
    async fn write(&self, request: WriteRequest) -> Result<String, BackendError>;

    /// Get backend information (name and model).
    fn backend_info(&self) -> BackendInfo;
}

/// A single "write" call.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    /// Instruction that frames the output (format, length, tone).
    pub system_prompt: String,
    /// The user-facing input for this call.
    pub user_text: String,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
}

impl WriteRequest {
    /// Creates a write request.
    pub fn new(system_prompt: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_text: user_text.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// Backend identification, used in logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Backend name (e.g., "openai", "mock").
    pub name: String,
    /// Model identifier (e.g., "gpt-4o-mini").
    pub model: String,
}

impl BackendInfo {
    /// Creates new backend info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Generation backend errors.
///
/// Every variant means the call produced no usable text. None of them are
/// retried by the core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        /// Reason for filtering.
        reason: String,
    },

    /// Backend is unavailable.
    #[error("backend unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider response envelope.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl BackendError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

//! OpenAI Backend - Implementation of GenerationBackend for OpenAI's API.
//!
//! Talks to any OpenAI-compatible chat-completions endpoint. Both port
//! operations are a single non-streaming completion call; nothing is retried.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let backend = OpenAIBackend::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::story::prompts::CLASSIFICATION_INSTRUCTION;
use crate::ports::{BackendError, BackendInfo, GenerationBackend, WriteRequest};

/// Token allowance for a classification answer (a single digit).
const CLASSIFY_MAX_TOKENS: u32 = 2;

/// Configuration for the OpenAI backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API backend implementation.
pub struct OpenAIBackend {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIBackend {
    /// Creates a new OpenAI backend with the given configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the HTTP client cannot be built
    pub fn new(config: OpenAIConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                BackendError::invalid_request(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts a write request to OpenAI's format.
    fn to_openai_request(&self, request: &WriteRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: self.config.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: Some(request.system_prompt.clone()),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: Some(request.user_text.clone()),
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    /// Sends one completion call and returns the generated text.
    async fn complete(&self, request: &WriteRequest) -> Result<String, BackendError> {
        let body = self.to_openai_request(request);
        debug!(model = %self.config.model, "Sending chat completion request");

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    BackendError::network(format!("Connection failed: {}", e))
                } else {
                    BackendError::network(e.to_string())
                }
            })?;

        self.parse_response(response).await
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, BackendError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(BackendError::AuthenticationFailed),
            429 => Err(BackendError::rate_limited(Self::parse_retry_after(&error_body))),
            400 => Err(BackendError::invalid_request(error_body)),
            500..=599 => Err(BackendError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(BackendError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses retry-after from error response.
    fn parse_retry_after(error_body: &str) -> u32 {
        let message = serde_json::from_str::<serde_json::Value>(error_body)
            .ok()
            .and_then(|parsed| {
                parsed
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            });

        message
            .as_deref()
            .and_then(|s| s.split("try again in ").nth(1))
            .and_then(|rest| {
                let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse::<u32>().ok()
            })
            .unwrap_or(30)
    }

    /// Parses a non-streaming response into its text.
    async fn parse_response(&self, response: Response) -> Result<String, BackendError> {
        let response = self.handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| BackendError::parse(format!("Failed to parse response: {}", e)))?;

        extract_text(openai_response)
    }
}

/// Pulls the first choice's text out of a completion response.
fn extract_text(response: OpenAIResponse) -> Result<String, BackendError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::parse("No choices in response"))?;

    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(BackendError::content_filtered("completion stopped by content filter"));
    }

    choice
        .message
        .content
        .ok_or_else(|| BackendError::parse("Choice has no content"))
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn classify(&self, text: &str) -> Result<String, BackendError> {
        let request = WriteRequest::new(CLASSIFICATION_INSTRUCTION, text)
            .with_max_tokens(CLASSIFY_MAX_TOKENS)
            .with_temperature(0.0);
        self.complete(&request).await
    }

    async fn write(&self, request: WriteRequest) -> Result<String, BackendError> {
        self.complete(&request).await
    }

    fn backend_info(&self) -> BackendInfo {
        BackendInfo::new("openai", &self.config.model)
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

//! Generation backend configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::OpenAIConfig;
use crate::application::services::GenerationSettings;

/// Longest story the instruction may ask for.
pub const MAX_WORD_BUDGET: u32 = 2000;

/// Generation backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the OpenAI-compatible endpoint
    pub api_key: Option<Secret<String>>,

    /// Base URL of the chat completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for both classification and writing
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Story length stated in the writing instruction
    #[serde(default = "default_word_budget")]
    pub word_budget: u32,

    /// Sampling temperature for story writing
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Builds the backend adapter configuration.
    pub fn openai_config(&self) -> Result<OpenAIConfig, ValidationError> {
        let key = self
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or(ValidationError::MissingRequired("AI__API_KEY"))?;

        Ok(OpenAIConfig::new(key.expose_secret().clone())
            .with_model(&self.model)
            .with_base_url(&self.base_url)
            .with_timeout(self.timeout()))
    }

    /// Builds the writing settings from the configured budget.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            word_budget: self.word_budget,
            temperature: self.temperature,
            ..GenerationSettings::default()
        }
    }

    /// Validate backend configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.word_budget == 0 || self.word_budget > MAX_WORD_BUDGET {
            return Err(ValidationError::InvalidWordBudget {
                max: MAX_WORD_BUDGET,
            });
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            word_budget: default_word_budget(),
            temperature: default_temperature(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_word_budget() -> u32 {
    100
}

fn default_temperature() -> f32 {
    0.8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> AiConfig {
        AiConfig {
            api_key: Some(Secret::new("sk-test".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.word_budget, 100);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_validation_missing_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("AI__API_KEY"))
        );
    }

    #[test]
    fn test_validation_empty_key() {
        let config = AiConfig {
            api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(config.openai_config().is_err());
    }

    #[test]
    fn test_validation_bad_base_url() {
        let config = AiConfig {
            base_url: "api.openai.com".to_string(),
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBaseUrl));
    }

    #[test]
    fn test_validation_word_budget_bounds() {
        let zero = AiConfig {
            word_budget: 0,
            ..configured()
        };
        let huge = AiConfig {
            word_budget: MAX_WORD_BUDGET + 1,
            ..configured()
        };
        assert!(zero.validate().is_err());
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_openai_config_carries_model_and_url() {
        let config = AiConfig {
            model: "gpt-4o".to_string(),
            base_url: "http://localhost:8080/v1".to_string(),
            ..configured()
        };
        let openai = config.openai_config().unwrap();
        assert_eq!(openai.model, "gpt-4o");
        assert_eq!(openai.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_generation_settings_use_word_budget() {
        let config = AiConfig {
            word_budget: 250,
            ..configured()
        };
        let settings = config.generation_settings();
        assert_eq!(settings.word_budget, 250);
        assert_eq!(settings.max_tokens, GenerationSettings::default().max_tokens);
    }
}

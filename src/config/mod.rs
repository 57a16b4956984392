//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `STORYTELLER` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use storyteller::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using model {}", config.ai.model);
//! ```

mod ai;
mod console;
mod database;
mod error;
mod logging;

pub use ai::{AiConfig, MAX_WORD_BUDGET};
pub use console::ConsoleConfig;
pub use database::{DatabaseConfig, MAX_POOL_SIZE};
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Generation backend (OpenAI-compatible)
    #[serde(default)]
    pub ai: AiConfig,

    /// PostgreSQL; absent means the in-memory store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub console: ConsoleConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `.env` if present, then every `STORYTELLER__*` variable:
    ///
    /// - `STORYTELLER__AI__API_KEY=...` -> `ai.api_key`
    /// - `STORYTELLER__DATABASE__URL=...` -> `database.url`
    /// - `STORYTELLER__LOGGING__JSON=true` -> `logging.json`
    /// - `STORYTELLER__CONSOLE__ACCOUNT=...` -> `console.account`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STORYTELLER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.logging.validate()?;
        self.console.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "STORYTELLER__AI__API_KEY",
        "STORYTELLER__AI__WORD_BUDGET",
        "STORYTELLER__DATABASE__URL",
        "STORYTELLER__DATABASE__MAX_CONNECTIONS",
        "STORYTELLER__LOGGING__JSON",
        "STORYTELLER__CONSOLE__ACCOUNT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        clear_env();
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_minimal_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("STORYTELLER__AI__API_KEY", "sk-test")]).unwrap();

        assert!(config.ai.has_api_key());
        assert_eq!(config.ai.word_budget, 100);
        assert!(config.database.is_none());
        assert!(!config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_database_section() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("STORYTELLER__AI__API_KEY", "sk-test"),
            ("STORYTELLER__DATABASE__URL", "postgresql://localhost/stories"),
            ("STORYTELLER__DATABASE__MAX_CONNECTIONS", "8"),
        ])
        .unwrap();

        let database = config.database.as_ref().unwrap();
        assert_eq!(database.url, "postgresql://localhost/stories");
        assert_eq!(database.max_connections, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("STORYTELLER__AI__API_KEY", "sk-test"),
            ("STORYTELLER__AI__WORD_BUDGET", "250"),
            ("STORYTELLER__LOGGING__JSON", "true"),
        ])
        .unwrap();

        assert_eq!(config.ai.word_budget, 250);
        assert!(config.logging.json);
        assert_eq!(config.console.account, "test_user");
    }

    #[test]
    fn test_load_console_account() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("STORYTELLER__AI__API_KEY", "sk-test"),
            ("STORYTELLER__CONSOLE__ACCOUNT", "grandma"),
        ])
        .unwrap();

        assert_eq!(config.console.account, "grandma");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("AI__API_KEY"))
        );
    }

    #[test]
    fn test_validation_failure_wraps_into_config_error() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("STORYTELLER__AI__API_KEY", "sk-test"),
            ("STORYTELLER__CONSOLE__ACCOUNT", " "),
        ])
        .unwrap();

        let err = config
            .validate()
            .map_err(ConfigError::ValidationFailed)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationFailed(ValidationError::MissingRequired("CONSOLE__ACCOUNT"))
        ));
        assert!(err.to_string().starts_with("Validation failed"));
    }
}

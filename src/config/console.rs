//! Console driver configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Settings for the interactive console chat
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Account that owns the conversations started from the console
    #[serde(default = "default_account")]
    pub account: String,
}

impl ConsoleConfig {
    /// Validate console configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.account.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CONSOLE__ACCOUNT"));
        }
        Ok(())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            account: default_account(),
        }
    }
}

fn default_account() -> String {
    "test_user".to_string()
}

//! Answer to a "start a new story?" confirmation prompt.

use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The user's answer in the confirmation handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confirmation {
    /// Abandon the current thread and start a new story.
    Yes,
    /// Keep the current thread; nothing changes.
    No,
}

impl FromStr for Confirmation {
    type Err = ValidationError;

    /// Accepts `y` or `n`, ignoring surrounding whitespace and ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let answer = s.trim();
        if answer.eq_ignore_ascii_case("y") {
            Ok(Confirmation::Yes)
        } else if answer.eq_ignore_ascii_case("n") {
            Ok(Confirmation::No)
        } else {
            Err(ValidationError::invalid_format(
                "confirmation",
                format!("expected 'y' or 'n', got '{}'", answer),
            ))
        }
    }
}

//! Intent of a user turn.
//!
//! The generation backend answers classification requests with a bare integer
//! code. Inside the crate that code is always carried as an [`Intent`], so a
//! routing decision over intents is checked for exhaustiveness by the
//! compiler. Codes outside `0..=3` never become an `Intent`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed classification of a user turn's purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Not a story request at all (code 0).
    OffTopic,
    /// A story request that violates the content policy (code 1).
    Unsafe,
    /// A request for a brand-new story (code 2).
    NewStory,
    /// A request to continue or change the current story (code 3).
    Extend,
}

/// Raised when an integer does not name a supported intent.
///
/// Codes 4 and above are reserved and deliberately not mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("intent code {0} is outside the supported range 0..=3")]
pub struct UnknownIntentCode(pub i64);

impl Intent {
    /// Every intent, in code order.
    pub const ALL: [Intent; 4] = [
        Intent::OffTopic,
        Intent::Unsafe,
        Intent::NewStory,
        Intent::Extend,
    ];

    /// Returns the persisted integer code.
    pub fn code(self) -> i16 {
        match self {
            Intent::OffTopic => 0,
            Intent::Unsafe => 1,
            Intent::NewStory => 2,
            Intent::Extend => 3,
        }
    }

    /// Maps an integer code back onto an intent.
    pub fn from_code(code: i64) -> Result<Self, UnknownIntentCode> {
        match code {
            0 => Ok(Intent::OffTopic),
            1 => Ok(Intent::Unsafe),
            2 => Ok(Intent::NewStory),
            3 => Ok(Intent::Extend),
            other => Err(UnknownIntentCode(other)),
        }
    }

    /// True for the intents whose model reply carries a story.
    pub fn carries_story(self) -> bool {
        matches!(self, Intent::NewStory | Intent::Extend)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intent::OffTopic => "off_topic",
            Intent::Unsafe => "unsafe",
            Intent::NewStory => "new_story",
            Intent::Extend => "extend",
        };
        write!(f, "{}", s)
    }
}

//! Story snapshot and its text format.
//!
//! Generated stories travel as plain text in two labelled segments:
//!
//! ```text
//! TITLE: The Brave Mouse
//!
//! STORY: Once upon a time...
//! ```
//!
//! Two parsers read that format. [`parse_story_text`] is lenient and is used
//! when reading history back: a message without a `STORY:` marker is still a
//! story, its whole text becomes the body. [`parse_generated_story`] is strict
//! and is used on fresh backend output, where a malformed answer should fall
//! back to caller-chosen defaults instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker that introduces the title segment.
pub const TITLE_MARKER: &str = "TITLE:";

/// Marker that introduces the body segment.
pub const STORY_MARKER: &str = "STORY:";

/// A story's title and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorySnapshot {
    pub title: String,
    pub body: String,
}

impl StorySnapshot {
    /// Creates a new snapshot.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Renders the snapshot in the canonical `TITLE: ...\n\nSTORY: ...` form.
    pub fn render(&self) -> String {
        format!("{} {}\n\n{} {}", TITLE_MARKER, self.title, STORY_MARKER, self.body)
    }
}

impl fmt::Display for StorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Splits `text` around the first `STORY:` marker.
///
/// Returns the (trimmed) title segment, if any, and the trimmed body.
fn split_segments(text: &str) -> Option<(Option<&str>, &str)> {
    let story_at = text.find(STORY_MARKER)?;
    let head = &text[..story_at];
    let body = text[story_at + STORY_MARKER.len()..].trim();

    let title = head
        .find(TITLE_MARKER)
        .map(|at| head[at + TITLE_MARKER.len()..].trim())
        .filter(|t| !t.is_empty());

    Some((title, body))
}

/// Reads a stored story message.
///
/// Without a `STORY:` marker the entire (trimmed) text is the body and the
/// title is `fallback_title`. With the marker but no usable `TITLE:` segment
/// the title also falls back.
pub fn parse_story_text(text: &str, fallback_title: &str) -> StorySnapshot {
    match split_segments(text) {
        Some((title, body)) => {
            StorySnapshot::new(title.unwrap_or(fallback_title), body)
        }
        None => StorySnapshot::new(fallback_title, text.trim()),
    }
}

/// Reads fresh backend output.
///
/// Returns `None` unless both markers are present and both segments are
/// non-empty.
pub fn parse_generated_story(text: &str) -> Option<StorySnapshot> {
    let (title, body) = split_segments(text)?;
    let title = title?;
    if body.is_empty() {
        return None;
    }
    Some(StorySnapshot::new(title, body))
}

//! Recovery of the current story from a conversation's history.
//!
//! No "current story" is persisted. The most recent model turn that carries a
//! story defines it, so the story is derived here on demand from the ordered
//! message log. Everything in this module is pure.

use crate::domain::conversation::Message;

use super::snapshot::{parse_story_text, StorySnapshot};

/// Title used when a stored story has no `TITLE:` segment.
pub const CONTINUED_STORY_TITLE: &str = "Continued Story";

/// Newest-first scan over the story-carrying model turns of a history.
///
/// The scan borrows the history and never allocates; calling [`StoryScan::new`]
/// again on the same slice restarts it from the most recent turn.
#[derive(Debug, Clone)]
pub struct StoryScan<'a> {
    remaining: std::slice::Iter<'a, Message>,
}

impl<'a> StoryScan<'a> {
    /// Starts a scan over `history`, which must be in log order (oldest first).
    pub fn new(history: &'a [Message]) -> Self {
        Self {
            remaining: history.iter(),
        }
    }
}

impl<'a> Iterator for StoryScan<'a> {
    type Item = &'a Message;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining.by_ref().rev().find(|message| message.is_story())
    }
}

/// Returns the story defined by the most recent story-carrying model turn.
///
/// `None` means the conversation has no story yet; that is not an error.
pub fn extract_current_story(history: &[Message], fallback_title: &str) -> Option<StorySnapshot> {
    StoryScan::new(history)
        .next()
        .map(|message| parse_story_text(message.content(), fallback_title))
}

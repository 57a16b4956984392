//! Conversation entity.
//!
//! A conversation is only an identity with an owner and a creation time; its
//! content lives in the message log. It is never mutated after creation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccountId, ConversationId, OwnedByAccount, Timestamp};

/// Maximum number of characters shown in a conversation preview.
pub const PREVIEW_CHARS: usize = 80;

/// A thread of turns owned by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    owner_id: AccountId,
    created_at: Timestamp,
}

impl Conversation {
    /// Starts a new conversation for the given account.
    pub fn start(owner_id: AccountId) -> Self {
        Self {
            id: ConversationId::new(),
            owner_id,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitutes a conversation from persistence.
    pub fn reconstitute(id: ConversationId, owner_id: AccountId, created_at: Timestamp) -> Self {
        Self {
            id,
            owner_id,
            created_at,
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}

impl OwnedByAccount for Conversation {
    fn owner_id(&self) -> &AccountId {
        &self.owner_id
    }
}

/// Builds the short preview shown in conversation listings.
///
/// Cuts on a character boundary and appends `...` when the text was longer
/// than [`PREVIEW_CHARS`].
pub fn preview_of(text: &str) -> String {
    let text = text.trim();
    let mut chars = text.char_indices();
    match chars.nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str) -> AccountId {
        AccountId::new(id).unwrap()
    }

    #[test]
    fn start_assigns_owner_and_fresh_id() {
        let a = Conversation::start(account("parent"));
        let b = Conversation::start(account("parent"));

        assert_ne!(a.id(), b.id());
        assert!(a.is_owned_by(&account("parent")));
        assert!(!a.is_owned_by(&account("someone-else")));
    }

    #[test]
    fn short_text_preview_is_unchanged() {
        assert_eq!(preview_of("  A tale of two kittens "), "A tale of two kittens");
    }

    #[test]
    fn long_text_preview_is_truncated() {
        let long = "word ".repeat(40);
        let preview = preview_of(&long);

        assert!(preview.ends_with("..."));
        assert!(preview.chars().count() <= PREVIEW_CHARS + 3);
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        let long = "é".repeat(100);
        let preview = preview_of(&long);
        assert_eq!(preview, format!("{}...", "é".repeat(PREVIEW_CHARS)));
    }
}

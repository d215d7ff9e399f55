//! Conversation metadata.

use crate::ids::ConversationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title given to a conversation before its first message.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Longest title taken verbatim from a first message, in characters.
pub const TITLE_MAX_CHARS: usize = 40;

/// A conversation as listed in the sidebar: identity, title and recency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique conversation identifier.
    pub id: ConversationId,

    /// Display title.
    pub title: String,

    /// Text of the most recent message.
    pub last_message: Option<String>,

    /// When the conversation was created.
    pub created_at: DateTime<Utc>,

    /// When the conversation last changed.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new, empty conversation.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::generate(),
            title: DEFAULT_TITLE.to_string(),
            last_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: ConversationId) -> Self {
        self.id = id;
        self
    }

    /// Record a message sent by the user. The title follows the latest user
    /// message, truncated.
    pub fn record_user_message(&mut self, text: &str) {
        self.title = title_from(text);
        self.touch(text);
    }

    /// Record a reply from the bot.
    pub fn record_bot_message(&mut self, text: &str) {
        self.touch(text);
    }

    fn touch(&mut self, text: &str) {
        self.last_message = Some(text.to_string());
        self.updated_at = Utc::now();
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Title for a conversation whose user just wrote `text`.
pub fn title_from(text: &str) -> String {
    match text.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

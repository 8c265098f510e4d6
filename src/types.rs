//! Common types used throughout the notify-bot.

use std::collections::BTreeSet;

use teloxide::types::ChatId;

/// Telegram user identifier as stored in the registry.
pub type MemberId = u64;

/// Opted-in members of a single chat.
pub type Members = BTreeSet<MemberId>;

/// Registry key for a chat.
///
/// Chats are keyed by the decimal form of their Telegram id, so group ids keep
/// their leading minus sign (`"-1001234567890"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChatKey(String);

impl ChatKey {
    pub fn new(key: impl Into<String>) -> Self {
        ChatKey(key.into())
    }

    /// Returns the key as stored in the registry file
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ChatId> for ChatKey {
    fn from(chat_id: ChatId) -> Self {
        ChatKey(chat_id.0.to_string())
    }
}

impl std::fmt::Display for ChatKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//! Rendering chat members as clickable mentions.

use rand::prelude::IndexedRandom;
use teloxide::utils::html;

use crate::types::MemberId;

/// Decorative glyphs used by [`EmojiMention`].
const MENTION_EMOJIS: &[&str] = &[
    "😀", "😎", "🤖", "👻", "👽", "🐱", "🐶", "🦊", "🐼", "🐸", "🐧", "🦉", "🐙", "🦄", "🐝",
    "🐢", "🐬", "🦋", "🌵", "🌻", "🍀", "🍄", "🌈", "🔥", "⭐", "🌙", "⚡", "❄️", "🍕", "🍩",
    "🍉", "🍒", "🥑", "🧀", "☕", "🎈", "🎉", "🎲", "🎸", "🎯", "🚀", "🛸", "⚓", "💎", "🔔",
    "📌", "🧩", "🪐", "🦀", "🐳",
];

/// Strategy for turning a member id into a mention token.
///
/// Tokens are Telegram HTML and must resolve to the given user.
pub trait MentionRenderer: Send + Sync {
    fn render(&self, member: MemberId) -> String;
}

/// Random emoji linked to the member's profile, picked anew on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmojiMention;

impl MentionRenderer for EmojiMention {
    fn render(&self, member: MemberId) -> String {
        let emoji = MENTION_EMOJIS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or("👤");
        user_link(member, emoji)
    }
}

/// Fixed label linked to the member's profile.
#[derive(Debug, Clone)]
pub struct LabelMention {
    label: String,
}

impl LabelMention {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl MentionRenderer for LabelMention {
    fn render(&self, member: MemberId) -> String {
        user_link(member, &self.label)
    }
}

/// HTML link to a user's profile deep link, with `label` escaped.
#[must_use]
pub fn user_link(member: MemberId, label: &str) -> String {
    format!(
        "<a href=\"tg://user?id={member}\">{}</a>",
        html::escape(label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_link_escapes_label() {
        assert_eq!(
            user_link(42, "<Bob & Co>"),
            "<a href=\"tg://user?id=42\">&lt;Bob &amp; Co&gt;</a>"
        );
    }

    #[test]
    fn label_mention_is_deterministic() {
        let renderer = LabelMention::new("user");
        assert_eq!(renderer.render(7), renderer.render(7));
        assert_eq!(renderer.render(7), "<a href=\"tg://user?id=7\">user</a>");
    }

    #[test]
    fn emoji_mention_links_to_member() {
        let token = EmojiMention.render(123_456);
        assert!(token.starts_with("<a href=\"tg://user?id=123456\">"));
        let label = token
            .trim_start_matches("<a href=\"tg://user?id=123456\">")
            .trim_end_matches("</a>");
        assert!(MENTION_EMOJIS.contains(&label));
    }
}

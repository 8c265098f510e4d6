//! Bot commands, where they may be used, and how they are published.

use strum::EnumString;
use teloxide::types::{BotCommand, Chat};

/// Commands understood by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Command {
    /// Join the chat's mention list.
    #[strum(serialize = "in", serialize = "i")]
    In,
    /// Leave the chat's mention list.
    #[strum(serialize = "out", serialize = "o")]
    Out,
    /// Mention everyone on the list.
    #[strum(serialize = "all", serialize = "a")]
    All,
    /// Show information about the bot.
    #[strum(serialize = "start", serialize = "help")]
    Start,
}

/// Kind of chat a command was sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    #[must_use]
    pub fn is_group(self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

impl From<&Chat> for ChatKind {
    fn from(chat: &Chat) -> Self {
        if chat.is_supergroup() {
            ChatKind::Supergroup
        } else if chat.is_group() {
            ChatKind::Group
        } else if chat.is_channel() {
            ChatKind::Channel
        } else {
            ChatKind::Private
        }
    }
}

impl Command {
    /// Parse the command at the start of `text`.
    ///
    /// Accepts `/name`, `/NAME` and `/name@bot_username`. The `@` suffix is
    /// ignored for the membership and broadcast commands; `/start` and
    /// `/help` addressed to a different bot are not ours. Anything after the
    /// first word is ignored.
    #[must_use]
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Command> {
        let token = text.split_whitespace().next()?;
        let name = token.strip_prefix('/')?;

        let (name, addressee) = match name.split_once('@') {
            Some((name, addressee)) => (name, Some(addressee)),
            None => (name, None),
        };
        let command: Command = name.parse().ok()?;

        if command == Command::Start
            && let (Some(addressee), Some(username)) = (addressee, bot_username)
            && !addressee.eq_ignore_ascii_case(username)
        {
            return None;
        }

        Some(command)
    }

    /// Whether the command may be used in a chat of `kind`.
    #[must_use]
    pub fn allowed_in(self, kind: ChatKind) -> bool {
        match self {
            Command::In | Command::Out | Command::All => kind.is_group(),
            Command::Start => true,
        }
    }
}

fn start_command() -> BotCommand {
    BotCommand::new("start", "About this bot")
}

/// Command list shown in every chat.
#[must_use]
pub fn default_commands() -> Vec<BotCommand> {
    vec![start_command()]
}

/// Command list shown in group chats.
#[must_use]
pub fn group_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("in", "Join the mention list"),
        BotCommand::new("out", "Leave the mention list"),
        BotCommand::new("all", "Mention everyone on the list"),
        start_command(),
    ]
}

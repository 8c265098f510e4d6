//! Telegram bot wiring: polling, command handlers and outbound messages.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use teloxide::{
    dptree,
    prelude::*,
    types::{BotCommandScope, ParseMode, ReplyParameters, User},
    utils::html,
};

use crate::broadcast::{BroadcastReport, Broadcaster, ChatSink};
use crate::commands::{ChatKind, Command, default_commands, group_commands};
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::membership::{MembershipService, MembershipStatus};
use crate::mention::{EmojiMention, user_link};
use crate::store::{JsonFileStore, RegistryStore};
use crate::types::ChatKey;

const START_TEXT: &str = "Hi, I'm a bot for mentioning everyone in Telegram group chats.\n\n\
Join the list with /in, leave it with /out and mention everyone on it with /all. \
Tap / to see all commands.\n\n\
<a href=\"https://github.com/corruptmane/notify-bot\">Source code</a>";

struct Data {
    membership: Arc<MembershipService>,
    broadcaster: Broadcaster,
    bot_username: Option<String>,
}

/// Sends messages to one Telegram chat.
struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

#[async_trait]
impl ChatSink for TelegramSink {
    async fn send(&self, text: String, silent: bool) -> Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .disable_notification(silent)
            .await?;
        Ok(())
    }
}

/// Run the Telegram bot until Ctrl-C.
///
/// Updates from different chats are handled concurrently; updates from the
/// same chat run one after another, so an `/in` waits for a running `/all`
/// in that chat to finish.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    let bot = Bot::new(&config.bot_token);

    debug!("Verifying bot token");
    let me = bot.get_me().await?;
    let bot_username = me.username.clone();
    info!(
        "Authorized as @{}",
        bot_username.as_deref().unwrap_or("<no username>")
    );

    publish_commands(&bot).await;

    debug!("Opening registry at {}", config.db_path.display());
    let store: Arc<dyn RegistryStore> = Arc::new(JsonFileStore::new(config.db_path));
    let membership = Arc::new(MembershipService::new(store));
    let broadcaster = Broadcaster::new(membership.clone(), Arc::new(EmojiMention));

    let data = Arc::new(Data {
        membership,
        broadcaster,
        bot_username,
    });

    info!("Starting long polling");
    Dispatcher::builder(bot, Update::filter_message().endpoint(handle_message))
        .dependencies(dptree::deps![data])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Polling stopped, closing Telegram session");
    Ok(())
}

/// Publish the default command list and the group-only list.
async fn publish_commands(bot: &Bot) {
    debug!("Registering bot commands");
    if let Err(e) = bot
        .set_my_commands(group_commands())
        .scope(BotCommandScope::AllGroupChats)
        .await
    {
        warn!("Failed to register group commands: {}", e);
    }
    if let Err(e) = bot.set_my_commands(default_commands()).await {
        warn!("Failed to register default commands: {}", e);
    }
}

async fn handle_message(bot: Bot, msg: Message, data: Arc<Data>) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(command) = Command::parse(text, data.bot_username.as_deref()) else {
        return Ok(());
    };

    let kind = ChatKind::from(&msg.chat);
    if !command.allowed_in(kind) {
        debug!("Ignoring {:?} in {:?} chat {}", command, kind, msg.chat.id.0);
        return Ok(());
    }

    info!("Received {:?} in chat {}", command, msg.chat.id.0);

    match command {
        Command::In | Command::Out => {
            let Some(user) = msg.from.as_ref() else {
                debug!("Ignoring {:?} without a sender", command);
                return Ok(());
            };
            let chat = ChatKey::from(msg.chat.id);
            let status = if command == Command::In {
                data.membership.opt_in(&chat, user.id.0).await
            } else {
                data.membership.opt_out(&chat, user.id.0).await
            };
            reply_status(&bot, &msg, user, status).await
        }
        Command::All => broadcast(&bot, &msg, &data).await,
        Command::Start => {
            bot.send_message(msg.chat.id, START_TEXT)
                .parse_mode(ParseMode::Html)
                .await?;
            Ok(())
        }
    }
}

/// Reply to a membership command, turning storage failures into a polite
/// message.
async fn reply_status(
    bot: &Bot,
    msg: &Message,
    user: &User,
    status: Result<MembershipStatus>,
) -> Result<()> {
    let text = match status {
        Ok(status) => {
            debug!(
                "Membership status for {} in chat {}: {:?}",
                user.id.0, msg.chat.id.0, status
            );
            status.render(&user_link(user.id.0, &user.full_name()))
        }
        Err(e) => {
            let Some(text) = storage_reply(&e) else {
                return Err(e);
            };
            error!("Membership update in chat {} failed: {}", msg.chat.id.0, e);
            text
        }
    };

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .disable_notification(true)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

async fn broadcast(bot: &Bot, msg: &Message, data: &Data) -> Result<()> {
    let chat = ChatKey::from(msg.chat.id);
    let sink = TelegramSink {
        bot: bot.clone(),
        chat_id: msg.chat.id,
    };

    match data.broadcaster.broadcast(&chat, &sink).await {
        Ok(BroadcastReport::Empty) => {
            debug!("Nothing to broadcast in chat {}", chat);
            Ok(())
        }
        Ok(BroadcastReport::Mentioned { members, pages }) => {
            debug!(
                "Broadcast in chat {} done: {} members, {} pages",
                chat, members, pages
            );
            Ok(())
        }
        Err(e) => {
            let Some(text) = storage_reply(&e) else {
                error!("Broadcast in chat {} aborted: {}", chat, e);
                return Err(e);
            };
            error!("Broadcast in chat {} could not read members: {}", chat, e);
            sink.send(text, true).await
        }
    }
}

/// Polite chat reply for a registry failure; other errors have none.
fn storage_reply(err: &BotError) -> Option<String> {
    err.is_storage().then(|| html::escape(&err.user_message()))
}

use crate::bot::resilient::{deliver_reply, send_message_resilient};
use crate::sticker::{StickerCommands, StickerKind};
use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};
use tracing::info;

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome message
    #[command(description = "Start the bot.")]
    Start,
    /// List commands
    #[command(description = "Show this help.")]
    Help,
    /// Random Doro sticker
    #[command(description = "Send a random Doro sticker.")]
    Doro,
    /// Random Cheshire sticker
    #[command(description = "Send a random Cheshire sticker.")]
    Cheshire,
}

impl Command {
    /// Sticker pipeline behind this command, if any.
    #[must_use]
    pub const fn sticker_kind(&self) -> Option<StickerKind> {
        match self {
            Self::Doro => Some(StickerKind::Doro),
            Self::Cheshire => Some(StickerKind::Cheshire),
            Self::Start | Self::Help => None,
        }
    }
}

/// Safe extraction of the sender's user ID from a message.
/// Returns 0 if the user information is missing.
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Answers `/start` and `/help` with the command list.
///
/// # Errors
///
/// Returns an error if the message cannot be sent.
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    send_message_resilient(&bot, msg.chat.id, Command::descriptions().to_string()).await?;
    Ok(())
}

/// Runs a sticker command and delivers its single reply.
///
/// # Errors
///
/// Returns an error if the reply cannot be delivered.
pub async fn sticker(
    bot: Bot,
    msg: Message,
    kind: StickerKind,
    commands: Arc<StickerCommands>,
) -> Result<()> {
    info!(
        command = kind.name(),
        chat_id = msg.chat.id.0,
        user_id = get_user_id_safe(&msg),
        "Sticker command received"
    );

    let reply = commands.invoke(kind).await;
    deliver_reply(&bot, msg.chat.id, &reply).await
}

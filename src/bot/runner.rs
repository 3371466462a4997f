use crate::bot;
use crate::bot::handlers::Command;
use crate::config::{ChatAllowList, Settings};
use crate::sticker::StickerCommands;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

/// Run the Telegram bot until Ctrl+C.
pub async fn run_bot(settings: Arc<Settings>, commands: Arc<StickerCommands>) {
    let bot = Bot::new(settings.telegram_token.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    let allowed = Arc::new(settings.chat_allow_list());
    if allowed.is_empty() {
        info!("Answering in all chats.");
    } else {
        info!("Answering in {} allowed chats.", allowed.len());
    }

    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![allowed, commands])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message().branch(
        dptree::filter(|msg: Message, allowed: Arc<ChatAllowList>| {
            allowed.is_allowed(msg.chat.id.0)
        })
        .filter_command::<Command>()
        .endpoint(handle_command),
    )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    commands: Arc<StickerCommands>,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd.sticker_kind() {
        Some(kind) => bot::handlers::sticker(bot, msg, kind, commands).await,
        None => bot::handlers::help(bot, msg).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

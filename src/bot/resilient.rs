//! Resilient reply delivery with automatic retry for Telegram API operations.
//!
//! This module wraps the Telegram send calls used to deliver a [`Reply`] so that
//! transient network failures are retried with exponential backoff and jitter.
//!
//! # Usage
//!
//! ```ignore
//! use doro_sticker_bot::bot::resilient::deliver_reply;
//!
//! deliver_reply(&bot, chat_id, &reply).await?;
//! ```

use crate::sticker::Reply;
use crate::utils::{is_gif_url, retry_telegram_operation};
use anyhow::Result;
use reqwest::Url;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, Message};
use tracing::warn;

/// Send a text message with automatic retry on network failures.
///
/// # Errors
///
/// Returns an error after all retries are exhausted.
pub async fn send_message_resilient(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
) -> Result<Message> {
    let text = text.into();
    retry_telegram_operation(|| async {
        bot.send_message(chat_id, text.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Telegram send error: {e}"))
    })
    .await
}

/// Send an image by URL with automatic retry on network failures.
///
/// GIFs go out as animations so Telegram plays them; everything else as a photo.
///
/// # Errors
///
/// Returns an error after all retries are exhausted.
pub async fn send_image_resilient(bot: &Bot, chat_id: ChatId, url: &Url) -> Result<Message> {
    let animated = is_gif_url(url.as_str());
    retry_telegram_operation(|| async {
        let file = InputFile::url(url.clone());
        let sent = if animated {
            bot.send_animation(chat_id, file).await
        } else {
            bot.send_photo(chat_id, file).await
        };
        sent.map_err(|e| anyhow::anyhow!("Telegram image send error: {e}"))
    })
    .await
}

/// Deliver a sticker pipeline reply to `chat_id`.
///
/// An image Telegram refuses (bad URL, unsupported media) degrades to a text
/// message carrying the URL, so the chat still gets exactly one answer.
///
/// # Errors
///
/// Returns an error if the text message (or text fallback) cannot be sent.
pub async fn deliver_reply(bot: &Bot, chat_id: ChatId, reply: &Reply) -> Result<()> {
    match reply {
        Reply::Text(text) => {
            send_message_resilient(bot, chat_id, text.as_str()).await?;
        }
        Reply::Image(url) => {
            let sent = match Url::parse(url) {
                Ok(parsed) => send_image_resilient(bot, chat_id, &parsed).await.map(|_| ()),
                Err(e) => Err(anyhow::anyhow!("Invalid sticker URL {url}: {e}")),
            };
            if let Err(e) = sent {
                warn!(
                    chat_id = chat_id.0,
                    error = %e,
                    "Image delivery failed, sending URL as text"
                );
                send_message_resilient(bot, chat_id, url.as_str()).await?;
            }
        }
    }
    Ok(())
}

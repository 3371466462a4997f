#![deny(missing_docs)]
//! Doro sticker bot.
//!
//! A Telegram bot that answers `/doro` and `/cheshire` with a random sticker
//! fetched from an upstream HTTP API, throttled by a per-command cooldown.

/// Telegram transport: commands, handlers and delivery.
pub mod bot;
/// Configuration management.
pub mod config;
/// Sticker fetching pipeline: cooldown, retries, response interpretation.
pub mod sticker;
/// Utility functions.
pub mod utils;

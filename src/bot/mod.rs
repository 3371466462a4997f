/// Command parsing and handlers
pub mod handlers;
/// Resilient reply delivery with automatic retry for Telegram API operations
pub mod resilient;
/// Dispatcher setup and bot entrypoint
pub mod runner;

//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! the delivery constants used by the Telegram layer.

use crate::sticker::{Locale, ResponseShape};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_token: String,

    /// Minimum interval between two completions of the same command, in seconds
    #[serde(default = "default_cooldown_period")]
    pub cooldown_period: u64,

    /// Per-request timeout for sticker API calls, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Language used for user-facing replies
    #[serde(default)]
    pub reply_language: Locale,

    /// Comma-separated list of chat IDs allowed to use the bot (empty means everyone)
    #[serde(rename = "allowed_chats")]
    pub allowed_chats_str: Option<String>,

    /// Endpoint of the `/doro` sticker API
    #[serde(default = "default_doro_api_url")]
    pub doro_api_url: String,
    /// Response shape of the `/doro` sticker API
    #[serde(default = "default_doro_response_shape")]
    pub doro_response_shape: ResponseShape,

    /// Endpoint of the `/cheshire` sticker API
    #[serde(default = "default_cheshire_api_url")]
    pub cheshire_api_url: String,
    /// Response shape of the `/cheshire` sticker API
    #[serde(default = "default_cheshire_response_shape")]
    pub cheshire_response_shape: ResponseShape,
}

const fn default_cooldown_period() -> u64 {
    60
}

const fn default_http_timeout_secs() -> u64 {
    30
}

fn default_doro_api_url() -> String {
    "https://www.doro.asia/api/random-sticker".to_string()
}

const fn default_doro_response_shape() -> ResponseShape {
    ResponseShape::Json
}

fn default_cheshire_api_url() -> String {
    "https://www.doro.asia/api/random-cheshire".to_string()
}

const fn default_cheshire_response_shape() -> ResponseShape {
    ResponseShape::Redirect
}

/// Builds the layered configuration source shared by all settings loaders.
///
/// # Errors
///
/// Returns a `ConfigError` if one of the sources cannot be read.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg.. `APP__COOLDOWN_PERIOD=30 ./target/app`
        .add_source(Environment::with_prefix("APP").separator("__"))
        // Plain UPPER_SNAKE_CASE variables map onto snake_case keys
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use doro_sticker_bot::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        build_config()?.try_deserialize()
    }

    /// Returns the set of chat IDs allowed to use the bot.
    ///
    /// An empty set means the bot answers in every chat.
    #[must_use]
    pub fn allowed_chats(&self) -> HashSet<i64> {
        self.allowed_chats_str
            .as_ref()
            .map(|s| {
                s.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .filter_map(|id| id.parse::<i64>().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parses the chat allow-list once, for use by the update filter.
    #[must_use]
    pub fn chat_allow_list(&self) -> ChatAllowList {
        ChatAllowList::new(self.allowed_chats())
    }
}

/// Chats the bot answers in, parsed once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatAllowList {
    chats: HashSet<i64>,
}

impl ChatAllowList {
    /// Wraps a parsed set; an empty set admits every chat.
    #[must_use]
    pub const fn new(chats: HashSet<i64>) -> Self {
        Self { chats }
    }

    /// Returns `true` if the bot should answer in `chat_id`.
    #[must_use]
    pub fn is_allowed(&self, chat_id: i64) -> bool {
        self.chats.is_empty() || self.chats.contains(&chat_id)
    }

    /// Number of explicitly allowed chats, zero when open to all.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    /// Returns `true` if no chat is listed, i.e. every chat is admitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}

/// Maximum attempts per sticker API call
pub const STICKER_API_MAX_RETRIES: u32 = 3;
/// Backoff before the second attempt; doubles for each later attempt
pub const STICKER_API_BASE_BACKOFF_MS: u64 = 1000;

// Telegram delivery retry configuration
/// Maximum retries for a Telegram API call
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;
/// Initial backoff for Telegram API retries
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Backoff ceiling for Telegram API retries
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 4000;

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_from(overrides: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        builder.build()?.try_deserialize()
    }

    #[test]
    fn test_defaults_applied() -> Result<(), ConfigError> {
        let settings = settings_from(&[("telegram_token", "dummy")])?;

        assert_eq!(settings.cooldown_period, 60);
        assert_eq!(settings.http_timeout_secs, 30);
        assert_eq!(settings.reply_language, Locale::En);
        assert_eq!(settings.doro_response_shape, ResponseShape::Json);
        assert_eq!(settings.cheshire_response_shape, ResponseShape::Redirect);
        assert!(settings.doro_api_url.starts_with("https://"));
        assert!(settings.allowed_chats().is_empty());
        Ok(())
    }

    #[test]
    fn test_overrides_parsed() -> Result<(), ConfigError> {
        let settings = settings_from(&[
            ("telegram_token", "dummy"),
            ("cooldown_period", "15"),
            ("reply_language", "zh"),
            ("doro_response_shape", "redirect"),
            ("cheshire_api_url", "https://cheshire.test/random"),
        ])?;

        assert_eq!(settings.cooldown_period, 15);
        assert_eq!(settings.reply_language, Locale::Zh);
        assert_eq!(settings.doro_response_shape, ResponseShape::Redirect);
        assert_eq!(settings.cheshire_api_url, "https://cheshire.test/random");
        Ok(())
    }

    #[test]
    fn test_missing_token_is_error() {
        assert!(settings_from(&[("cooldown_period", "15")]).is_err());
    }

    #[test]
    fn test_allowed_chats_parsing() -> Result<(), ConfigError> {
        let mut settings = settings_from(&[("telegram_token", "dummy")])?;

        // Everyone is allowed when the list is unset
        assert!(settings.chat_allow_list().is_allowed(42));

        settings.allowed_chats_str = Some("-100123; 456, 789".to_string());
        let allowed = settings.allowed_chats();
        assert_eq!(allowed.len(), 3);
        assert!(allowed.contains(&-100_123));

        let list = settings.chat_allow_list();
        assert!(list.is_allowed(456));
        assert!(!list.is_allowed(42));

        // Bad tokens are skipped
        settings.allowed_chats_str = Some("abc, 777".to_string());
        let allowed = settings.allowed_chats();
        assert_eq!(allowed.len(), 1);
        assert!(allowed.contains(&777));
        Ok(())
    }

    #[test]
    fn test_allow_list_is_a_snapshot() -> Result<(), ConfigError> {
        let mut settings = settings_from(&[
            ("telegram_token", "dummy"),
            ("allowed_chats", "100 200"),
        ])?;
        let list = settings.chat_allow_list();

        // Later edits to the raw string do not leak into the parsed list
        settings.allowed_chats_str = Some("300".to_string());
        assert_eq!(list.len(), 2);
        assert!(list.is_allowed(100));
        assert!(!list.is_allowed(300));
        Ok(())
    }
}

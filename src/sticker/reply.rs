//! User-facing replies
//!
//! Every invocation ends in exactly one [`Reply`]. The wording follows the
//! configured [`Locale`].

use super::cooldown::CooldownStatus;
use super::FetchOutcome;
use serde::{Deserialize, Serialize};

/// What the bot sends back to the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text message
    Text(String),
    /// Image message pointing at a sticker URL
    Image(String),
}

impl Reply {
    /// Text body, if this is a text reply.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }
}

/// Reply language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Simplified Chinese
    Zh,
}

/// Reply for a blocked invocation. Remaining time is rounded to whole seconds.
#[must_use]
pub fn cooldown_reply(locale: Locale, label: &str, status: &CooldownStatus) -> Reply {
    let remaining = status.remaining_secs();
    Reply::Text(match locale {
        Locale::En => {
            format!("Please wait {remaining:.0} seconds before the next random {label} sticker.")
        }
        Locale::Zh => format!("请稍等，距离下一次获取随机{label}表情包还有 {remaining:.0} 秒。"),
    })
}

/// Reply for a terminal fetch outcome.
#[must_use]
pub fn outcome_reply(locale: Locale, outcome: &FetchOutcome) -> Reply {
    let text = match outcome {
        FetchOutcome::Success(url) => return Reply::Image(url.clone()),
        FetchOutcome::EmptyResult => match locale {
            Locale::En => "No sticker obtained, please try again later.".to_string(),
            Locale::Zh => "未获取到表情包，请稍后再试".to_string(),
        },
        FetchOutcome::ApiLevelFailure(message) => match locale {
            Locale::En => format!("API request failed: {message}"),
            Locale::Zh => format!("API 返回失败：{message}"),
        },
        FetchOutcome::HttpStatusFailure(code) => match locale {
            Locale::En => format!("API request failed, code: {code}"),
            Locale::Zh => format!("API 请求失败，错误码：{code}"),
        },
        FetchOutcome::TransientNetworkFailure(_) => match locale {
            Locale::En => {
                "Request failed, please check the network or whether the API is available."
                    .to_string()
            }
            Locale::Zh => "请求失败，请检查网络或 API 是否可用".to_string(),
        },
        FetchOutcome::UnknownFailure(cause) => match locale {
            Locale::En => format!("Unknown error: {cause}"),
            Locale::Zh => format!("发生未知错误：{cause}"),
        },
    };
    Reply::Text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_success_is_image() {
        let reply = outcome_reply(
            Locale::En,
            &FetchOutcome::Success("https://x/y.png".to_string()),
        );
        assert_eq!(reply, Reply::Image("https://x/y.png".to_string()));
        assert_eq!(reply.as_text(), None);
    }

    #[test]
    fn test_failure_texts_en() {
        let cases = [
            (
                FetchOutcome::ApiLevelFailure("rate limited".to_string()),
                "API request failed: rate limited",
            ),
            (
                FetchOutcome::HttpStatusFailure(503),
                "API request failed, code: 503",
            ),
            (
                FetchOutcome::UnknownFailure("expected value".to_string()),
                "Unknown error: expected value",
            ),
        ];
        for (outcome, expected) in cases {
            assert_eq!(
                outcome_reply(Locale::En, &outcome),
                Reply::Text(expected.to_string())
            );
        }

        let empty = outcome_reply(Locale::En, &FetchOutcome::EmptyResult);
        assert!(empty.as_text().is_some_and(|t| t.starts_with("No sticker obtained")));

        let network = outcome_reply(
            Locale::En,
            &FetchOutcome::TransientNetworkFailure("timed out".to_string()),
        );
        assert!(network.as_text().is_some_and(|t| t.contains("check the network")));
    }

    #[test]
    fn test_failure_texts_zh() {
        assert_eq!(
            outcome_reply(Locale::Zh, &FetchOutcome::HttpStatusFailure(404)),
            Reply::Text("API 请求失败，错误码：404".to_string())
        );
        assert_eq!(
            outcome_reply(Locale::Zh, &FetchOutcome::EmptyResult),
            Reply::Text("未获取到表情包，请稍后再试".to_string())
        );
    }

    #[test]
    fn test_cooldown_reply_rounds_seconds() {
        let status = CooldownStatus {
            on_cooldown: true,
            remaining: Duration::from_millis(41_600),
        };
        assert_eq!(
            cooldown_reply(Locale::En, "Doro", &status),
            Reply::Text("Please wait 42 seconds before the next random Doro sticker.".to_string())
        );
        assert_eq!(
            cooldown_reply(Locale::Zh, "Doro", &status),
            Reply::Text("请稍等，距离下一次获取随机Doro表情包还有 42 秒。".to_string())
        );
    }
}

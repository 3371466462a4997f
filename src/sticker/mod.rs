//! Sticker fetching pipeline
//!
//! Each chat command owns one [`StickerCommand`]: a cooldown gate in front of a
//! retrying fetch against an upstream sticker API. Every attempt is classified into
//! a [`FetchOutcome`] once, and [`FetchOutcome::retry_decision`] alone decides
//! whether the dispatcher tries again.

/// Injectable time source.
pub mod clock;
/// Per-command pipelines and their registry.
pub mod command;
/// Cooldown gate and updater.
pub mod cooldown;
/// Retry loop with exponential backoff.
pub mod dispatcher;
/// Response interpretation for the supported API shapes.
pub mod interpreter;
/// User-facing replies.
pub mod reply;
/// Upstream sticker sources.
pub mod source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{StickerCommand, StickerCommands, StickerKind};
pub use cooldown::{CommandState, CooldownStatus};
pub use dispatcher::{dispatch_with_retry, RetryPolicy};
pub use reply::{Locale, Reply};
pub use source::{HttpStickerSource, ResponseShape, StickerSource};

use thiserror::Error;

/// Errors raised while wiring up sticker sources at startup
#[derive(Debug, Error)]
pub enum StickerError {
    /// Configured endpoint is not a valid absolute URL
    #[error("Invalid endpoint URL {url}: {reason}")]
    InvalidEndpoint {
        /// The rejected URL
        url: String,
        /// Parser error description
        reason: String,
    },
    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Result of a single fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A sticker URL was obtained
    Success(String),
    /// The API answered but carried no sticker URL
    EmptyResult,
    /// The API reported a failure of its own
    ApiLevelFailure(String),
    /// The API answered with a non-2xx status
    HttpStatusFailure(u16),
    /// Connect, timeout or other transport error
    TransientNetworkFailure(String),
    /// Anything else, including malformed bodies
    UnknownFailure(String),
}

/// What the dispatcher does after an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again while the retry budget lasts
    Retry,
    /// Stop immediately and surface the outcome
    Terminal,
}

impl FetchOutcome {
    /// Retry table for the outcome taxonomy.
    #[must_use]
    pub const fn retry_decision(&self) -> RetryDecision {
        match self {
            Self::HttpStatusFailure(_) | Self::TransientNetworkFailure(_) => RetryDecision::Retry,
            Self::Success(_)
            | Self::EmptyResult
            | Self::ApiLevelFailure(_)
            | Self::UnknownFailure(_) => RetryDecision::Terminal,
        }
    }

    /// Returns `true` for [`FetchOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Short tag used in structured log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::EmptyResult => "empty_result",
            Self::ApiLevelFailure(_) => "api_failure",
            Self::HttpStatusFailure(_) => "http_status",
            Self::TransientNetworkFailure(_) => "network",
            Self::UnknownFailure(_) => "unknown",
        }
    }
}

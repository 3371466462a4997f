//! Per-command sticker pipelines
//!
//! A [`StickerCommand`] runs gate → dispatcher → interpreter → emitter for one
//! chat command and records the completion time on every terminal path.

use super::clock::{Clock, SystemClock};
use super::cooldown::CommandState;
use super::dispatcher::{dispatch_with_retry, RetryPolicy};
use super::reply::{cooldown_reply, outcome_reply, Locale, Reply};
use super::source::{HttpStickerSource, ResponseShape, StickerSource};
use super::{FetchOutcome, StickerError};
use crate::config::Settings;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Sticker commands exposed to chats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickerKind {
    /// `/doro`
    Doro,
    /// `/cheshire`
    Cheshire,
}

impl StickerKind {
    /// Command name without the leading slash.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Doro => "doro",
            Self::Cheshire => "cheshire",
        }
    }

    /// Display name used in replies.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Doro => "Doro",
            Self::Cheshire => "Cheshire",
        }
    }
}

/// One cooldown-gated, retrying sticker pipeline
pub struct StickerCommand {
    kind: StickerKind,
    source: Arc<dyn StickerSource>,
    state: CommandState,
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
    locale: Locale,
}

impl StickerCommand {
    /// Creates a pipeline with the default retry policy.
    #[must_use]
    pub fn new(
        kind: StickerKind,
        source: Arc<dyn StickerSource>,
        cooldown_period: Duration,
        clock: Arc<dyn Clock>,
        locale: Locale,
    ) -> Self {
        Self {
            kind,
            source,
            state: CommandState::new(cooldown_period),
            policy: RetryPolicy::default(),
            clock,
            locale,
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Cooldown state of this command.
    #[must_use]
    pub const fn state(&self) -> &CommandState {
        &self.state
    }

    /// Runs one invocation and returns the single reply to send.
    ///
    /// A blocked invocation performs no network activity and leaves the
    /// cooldown state untouched.
    pub async fn invoke(&self) -> Reply {
        let command = self.kind.name();

        let status = self.state.check(self.clock.now()).await;
        if status.on_cooldown {
            info!(
                command,
                remaining_secs = status.remaining_secs(),
                "Sticker command on cooldown"
            );
            return cooldown_reply(self.locale, self.kind.label(), &status);
        }

        let outcome = dispatch_with_retry(self.source.as_ref(), &self.policy, command).await;
        self.state.record_completion(self.clock.now()).await;

        match &outcome {
            FetchOutcome::Success(url) => info!(command, url = %url, "Sticker fetched"),
            FetchOutcome::EmptyResult => warn!(command, "Sticker API returned no sticker"),
            FetchOutcome::ApiLevelFailure(message) => {
                error!(command, message = %message, "Sticker API reported failure");
            }
            FetchOutcome::HttpStatusFailure(code) => error!(
                command,
                status = code,
                attempts = self.policy.max_retries,
                "Sticker API status error after retries"
            ),
            FetchOutcome::TransientNetworkFailure(cause) => error!(
                command,
                cause = %cause,
                attempts = self.policy.max_retries,
                "Sticker API request error after retries"
            ),
            FetchOutcome::UnknownFailure(cause) => {
                error!(command, cause = %cause, "Unknown sticker API error");
            }
        }

        outcome_reply(self.locale, &outcome)
    }
}

/// The bot's sticker commands, each with its own cooldown clock
pub struct StickerCommands {
    doro: StickerCommand,
    cheshire: StickerCommand,
}

impl StickerCommands {
    /// Bundles two pipelines.
    #[must_use]
    pub const fn new(doro: StickerCommand, cheshire: StickerCommand) -> Self {
        Self { doro, cheshire }
    }

    /// Builds both pipelines from settings, using HTTP sources and the system clock.
    ///
    /// # Errors
    ///
    /// Returns a `StickerError` if an endpoint is invalid or the HTTP client
    /// cannot be built.
    pub fn from_settings(settings: &Settings) -> Result<Self, StickerError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cooldown = Duration::from_secs(settings.cooldown_period);
        let timeout = Duration::from_secs(settings.http_timeout_secs);

        let build = |kind: StickerKind, url: &str, shape: ResponseShape| {
            let source = HttpStickerSource::new(url, shape, timeout)?;
            info!(
                command = kind.name(),
                endpoint = %source.endpoint(),
                shape = ?source.shape(),
                "Sticker source configured"
            );
            Ok::<_, StickerError>(StickerCommand::new(
                kind,
                Arc::new(source),
                cooldown,
                clock.clone(),
                settings.reply_language,
            ))
        };

        Ok(Self {
            doro: build(
                StickerKind::Doro,
                &settings.doro_api_url,
                settings.doro_response_shape,
            )?,
            cheshire: build(
                StickerKind::Cheshire,
                &settings.cheshire_api_url,
                settings.cheshire_response_shape,
            )?,
        })
    }

    /// Pipeline serving `kind`.
    #[must_use]
    pub const fn get(&self, kind: StickerKind) -> &StickerCommand {
        match kind {
            StickerKind::Doro => &self.doro,
            StickerKind::Cheshire => &self.cheshire,
        }
    }

    /// Runs one invocation of `kind`.
    pub async fn invoke(&self, kind: StickerKind) -> Reply {
        self.get(kind).invoke().await
    }
}

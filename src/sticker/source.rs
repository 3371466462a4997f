//! Upstream sticker sources
//!
//! A source performs exactly one HTTP attempt per [`StickerSource::fetch`] call and
//! classifies it. Retrying is the dispatcher's job.

use super::interpreter::{interpret_json, interpret_redirect};
use super::{FetchOutcome, StickerError};
use reqwest::redirect::Policy;
use reqwest::{Client as HttpClient, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Upper bound on redirects followed within one attempt.
const MAX_REDIRECTS: usize = 10;

/// How an upstream API delivers its sticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// The API redirects to the sticker; the final URL is the payload
    Redirect,
    /// The API answers with a JSON body carrying the sticker URL
    Json,
}

/// One attempt against an upstream sticker API
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StickerSource: Send + Sync {
    /// Performs a single request and classifies the result.
    async fn fetch(&self) -> FetchOutcome;
}

/// `reqwest`-backed source
#[derive(Debug, Clone)]
pub struct HttpStickerSource {
    client: HttpClient,
    endpoint: Url,
    shape: ResponseShape,
}

impl HttpStickerSource {
    /// Creates a source for `endpoint`, bounding every attempt by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `StickerError::InvalidEndpoint` if `endpoint` is not an absolute
    /// http(s) URL, or `StickerError::Client` if the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        shape: ResponseShape,
        timeout: Duration,
    ) -> Result<Self, StickerError> {
        let endpoint = Url::parse(endpoint).map_err(|e| StickerError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(StickerError::InvalidEndpoint {
                url: endpoint.to_string(),
                reason: format!("unsupported scheme {}", endpoint.scheme()),
            });
        }

        let client = HttpClient::builder()
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| StickerError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            shape,
        })
    }

    /// Configured endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Configured response shape.
    #[must_use]
    pub const fn shape(&self) -> ResponseShape {
        self.shape
    }
}

/// Maps a transport-level `reqwest` error onto the outcome taxonomy.
fn classify_request_error(error: &reqwest::Error) -> FetchOutcome {
    if let Some(status) = error.status() {
        return FetchOutcome::HttpStatusFailure(status.as_u16());
    }
    if error.is_builder() {
        return FetchOutcome::UnknownFailure(error.to_string());
    }
    FetchOutcome::TransientNetworkFailure(error.to_string())
}

#[async_trait::async_trait]
impl StickerSource for HttpStickerSource {
    async fn fetch(&self) -> FetchOutcome {
        let response = match self.client.get(self.endpoint.clone()).send().await {
            Ok(response) => response,
            Err(e) => return classify_request_error(&e),
        };

        let status = response.status();
        debug!(
            endpoint = %self.endpoint,
            final_url = %response.url(),
            status = status.as_u16(),
            "Sticker API responded"
        );

        match self.shape {
            ResponseShape::Redirect => {
                interpret_redirect(
                    status,
                    self.endpoint.as_str(),
                    Some(response.url().as_str()),
                )
            }
            ResponseShape::Json => {
                if !status.is_success() {
                    return FetchOutcome::HttpStatusFailure(status.as_u16());
                }
                match response.text().await {
                    Ok(body) => interpret_json(status, &body),
                    Err(e) => classify_request_error(&e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_endpoint() {
        let result =
            HttpStickerSource::new("not a url", ResponseShape::Json, Duration::from_secs(1));
        assert!(matches!(result, Err(StickerError::InvalidEndpoint { .. })));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = HttpStickerSource::new(
            "ftp://stickers.example/random",
            ResponseShape::Redirect,
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(StickerError::InvalidEndpoint { .. })));
    }

    #[test]
    fn test_accepts_https_endpoint() -> Result<(), StickerError> {
        let source = HttpStickerSource::new(
            "https://www.doro.asia/api/random-sticker",
            ResponseShape::Json,
            Duration::from_secs(1),
        )?;
        assert_eq!(source.shape(), ResponseShape::Json);
        assert_eq!(source.endpoint().host_str(), Some("www.doro.asia"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transient() -> Result<(), StickerError> {
        // Port 9 (discard) on localhost is closed in test environments
        let source = HttpStickerSource::new(
            "http://127.0.0.1:9/random",
            ResponseShape::Json,
            Duration::from_secs(2),
        )?;
        assert!(matches!(
            source.fetch().await,
            FetchOutcome::TransientNetworkFailure(_)
        ));
        Ok(())
    }
}

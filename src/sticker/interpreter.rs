//! Response interpretation
//!
//! Turns a raw upstream response into a [`FetchOutcome`]. Two API shapes are
//! supported:
//!
//! - redirect APIs, where the final URL after following redirects *is* the sticker;
//! - JSON APIs answering `{"success": true, "sticker": {"url": "..."}}` or
//!   `{"success": false, "message": "..."}`.

use super::FetchOutcome;
use reqwest::StatusCode;
use serde::Deserialize;

/// Message used when a failing JSON API gives no reason.
pub const NO_DETAIL: &str = "no detail";

#[derive(Debug, Deserialize)]
struct StickerPayload {
    // Absent means the API did not confirm success
    #[serde(default)]
    success: bool,
    #[serde(default)]
    sticker: Option<StickerField>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StickerField {
    #[serde(default)]
    url: Option<String>,
}

/// Interprets a response from a redirect API.
///
/// `requested` is the endpoint that was called. A response that never left it
/// carries no sticker.
#[must_use]
pub fn interpret_redirect(
    status: StatusCode,
    requested: &str,
    final_url: Option<&str>,
) -> FetchOutcome {
    if !status.is_success() {
        return FetchOutcome::HttpStatusFailure(status.as_u16());
    }

    match final_url.map(str::trim) {
        Some(url) if !url.is_empty() && url != requested.trim() => {
            FetchOutcome::Success(url.to_string())
        }
        _ => FetchOutcome::EmptyResult,
    }
}

/// Interprets a response from a JSON API.
#[must_use]
pub fn interpret_json(status: StatusCode, body: &str) -> FetchOutcome {
    if !status.is_success() {
        return FetchOutcome::HttpStatusFailure(status.as_u16());
    }

    let payload: StickerPayload = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(e) => return FetchOutcome::UnknownFailure(format!("malformed response: {e}")),
    };

    if !payload.success {
        let message = payload
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| NO_DETAIL.to_string());
        return FetchOutcome::ApiLevelFailure(message);
    }

    match payload
        .sticker
        .and_then(|sticker| sticker.url)
        .filter(|url| !url.trim().is_empty())
    {
        Some(url) => FetchOutcome::Success(url.trim().to_string()),
        None => FetchOutcome::EmptyResult,
    }
}

//! Response classification: turning non-2xx responses into [`DropboxError`]s.

use super::transport::RawResponse;
use crate::errors::{DropboxError, Result};
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde::Deserialize;

/// Maximum characters of a body kept when it is echoed into logs.
pub(crate) const BODY_PREVIEW_LENGTH: usize = 200;

/// JSON error payload returned by the API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    reason: String,
}

/// Reports whether the `Content-Type` header, trimmed of surrounding
/// whitespace, starts with `prefix`.
///
/// Media types are compared ASCII case-insensitively on the raw header
/// bytes, so non-ASCII parameters after the media type do not prevent a
/// match. A missing header never matches; a present but empty header matches
/// the empty prefix.
pub(crate) fn has_content_type(headers: &HeaderMap, prefix: &str) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return false;
    };
    value
        .as_bytes()
        .trim_ascii()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// Checks a response's status, handing it back untouched on 2xx.
///
/// On any other status the body is consumed and interpreted according to
/// its content type:
///
/// - `application/json`: decoded as `{"reason": ...}` into
///   [`DropboxError::Remote`]. Malformed JSON is a
///   [`DropboxError::Serialization`]; an empty or all-whitespace body is
///   [`DropboxError::Unexpected`].
/// - `text/plain`: the whole body becomes the reason. A failed read is a
///   [`DropboxError::Io`].
/// - anything else, including no content type: [`DropboxError::Unexpected`].
///
/// The body is dropped before this returns an error.
///
/// # Errors
///
/// See above; this function only returns `Ok` for 2xx statuses.
pub async fn check_response(response: RawResponse) -> Result<RawResponse> {
    if response.status.is_success() {
        return Ok(response);
    }

    let RawResponse {
        status,
        headers,
        body,
    } = response;

    if has_content_type(&headers, "application/json") {
        let bytes = body.bytes().await?;
        if bytes.trim_ascii().is_empty() {
            tracing::debug!("API error {} with empty JSON body", status);
            return Err(DropboxError::Unexpected { status });
        }
        let api_error: ApiErrorBody = serde_json::from_slice(&bytes)?;
        tracing::debug!("API error {}: {}", status, api_error.reason);
        return Err(DropboxError::Remote {
            status,
            reason: api_error.reason,
        });
    }

    if has_content_type(&headers, "text/plain") {
        let reason = body.text().await?;
        tracing::debug!(
            "API error {}: {}",
            status,
            truncate_for_context(&reason, BODY_PREVIEW_LENGTH)
        );
        return Err(DropboxError::Remote { status, reason });
    }

    drop(body);
    tracing::debug!("API error {} with unrecognized content type", status);
    Err(DropboxError::Unexpected { status })
}

/// Truncates a string to specified length, adding "..." if truncated.
///
/// Uses character-boundary-aware slicing to prevent panics on multi-byte UTF-8 characters.
pub(crate) fn truncate_for_context(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let truncate_at = s
            .char_indices()
            .take_while(|(i, c)| i + c.len_utf8() <= max_len)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..truncate_at])
    }
}

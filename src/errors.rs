use crate::http::transport::TransportError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the Dropbox API.
///
/// Only [`Remote`](Self::Remote) and [`Unexpected`](Self::Unexpected) are
/// produced by interpreting an HTTP response; every other variant is passed
/// up unchanged from the layer that failed.
///
/// # Example: Handling API Errors
///
/// ```ignore
/// match client.files().list_folder("/photos").await {
///     Err(DropboxError::Remote { status, reason }) => {
///         tracing::warn!("Dropbox refused the listing ({}): {}", status, reason);
///     }
///     Err(DropboxError::Transport(e)) => {
///         tracing::error!("could not reach Dropbox: {}", e);
///     }
///     // ...
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DropboxError {
    /// The transport could not obtain a response (connection failure,
    /// redirect loop, TLS error, ...). The source error is the transport's
    /// own and can be downcast.
    #[error("HTTP transport error: {0}")]
    Transport(#[source] TransportError),
    /// A request body could not be encoded, or a response body could not be
    /// decoded.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
    /// A configured header (user agent, locale) is not a valid header value.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    /// The API answered with a non-2xx status and a JSON or plain-text reason.
    #[error("Dropbox API error (HTTP {status}): {reason}")]
    Remote {
        /// HTTP status code of the response
        status: StatusCode,
        /// Reason text, taken from the `reason` JSON field or the plain-text body
        reason: String,
    },
    /// The API answered with a non-2xx status and a body this client cannot
    /// interpret.
    #[error("unexpected error (HTTP {status})")]
    Unexpected { status: StatusCode },
    /// Reading a response body failed, e.g. on a read timeout.
    #[error("I/O error reading response body: {0}")]
    Io(#[from] std::io::Error),
}

impl DropboxError {
    /// Returns `true` for errors that came from a non-2xx API response.
    #[must_use]
    pub const fn is_api_error(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Unexpected { .. })
    }

    /// The reason text of a [`Remote`](Self::Remote) error.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Remote { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// The HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote { status, .. } | Self::Unexpected { status } => Some(*status),
            _ => None,
        }
    }
}

/// Shorthand for results whose error is [`DropboxError`].
pub type Result<T, E = DropboxError> = std::result::Result<T, E>;

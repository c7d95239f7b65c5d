//! Transport boundary between the RPC pipeline and the network.
//!
//! Everything above this module talks to an [`HttpTransport`] trait object,
//! so the request builder, classifier, executor and paginator can run
//! against a scripted fake in tests. [`ReqwestTransport`] is the production
//! implementation.
//!
//! Authentication is not handled here: hand the transport a
//! `reqwest::Client` that already attaches credentials (for example via
//! default headers).

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt, TryStreamExt};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use std::fmt;
use std::io;
use std::pin::Pin;
use url::Url;

/// Error produced by a transport when no response was received.
///
/// Kept as a boxed trait object so callers can downcast to the concrete
/// client error (e.g. `reqwest::Error`).
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An RPC request ready to be sent.
///
/// Built fresh for each call by [`Client::new_rpc_request`](crate::Client::new_rpc_request)
/// and consumed by the transport.
#[derive(Debug, Clone)]
pub struct RpcRequest {
    pub method: Method,
    /// Absolute URL, already resolved against the client's base URL.
    pub url: Url,
    pub headers: HeaderMap,
    /// Serialized JSON payload, if any.
    pub body: Option<Bytes>,
}

type BodyStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// A response body that can be read once.
///
/// Every reading method takes `self`, so a body is consumed at most once and
/// is dropped (releasing the underlying connection) as soon as the reader
/// returns, whether it succeeded or not.
pub struct ResponseBody {
    stream: BodyStream,
}

impl ResponseBody {
    /// Wraps a stream of body chunks.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self {
            stream: Box::pin(stream),
        }
    }

    /// A body with no content.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_stream(futures_util::stream::empty())
    }

    /// Reads the whole body into memory.
    ///
    /// # Errors
    ///
    /// Returns the first chunk error reported by the stream, e.g. a read
    /// timeout.
    pub async fn bytes(mut self) -> io::Result<Bytes> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.stream.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Reads the whole body as text. Invalid UTF-8 is replaced, not rejected.
    ///
    /// # Errors
    ///
    /// Same as [`bytes`](Self::bytes).
    pub async fn text(self) -> io::Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Drop for ResponseBody {
    fn drop(&mut self) {
        tracing::trace!("response body released");
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody").finish_non_exhaustive()
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        Self::from_stream(futures_util::stream::iter([Ok(bytes)]))
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        Self::from(Bytes::from(text))
    }
}

impl From<&'static str> for ResponseBody {
    fn from(text: &'static str) -> Self {
        Self::from(Bytes::from_static(text.as_bytes()))
    }
}

/// A received HTTP response whose body has not been read yet.
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl RawResponse {
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<ResponseBody>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }
}

/// The HTTP capability the client depends on.
///
/// Implementations perform exactly one exchange per call: no retries, no
/// interpretation of the status code. Non-2xx responses must be returned as
/// `Ok`; only failures to obtain a response at all (connection errors,
/// redirect loops, ...) are `Err`.
#[async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    async fn send(&self, request: RpcRequest) -> Result<RawResponse, TransportError>;
}

/// [`HttpTransport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps a pre-configured (typically pre-authenticated) reqwest client.
    #[must_use]
    pub const fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    #[must_use]
    pub const fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: RpcRequest) -> Result<RawResponse, TransportError> {
        let RpcRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.http_client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let stream = response.bytes_stream().map_err(io::Error::other);

        Ok(RawResponse {
            status,
            headers,
            body: ResponseBody::from_stream(stream),
        })
    }
}

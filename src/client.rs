use crate::errors::{DropboxError, Result};
use crate::files::FilesService;
use crate::http::common::{
    DEFAULT_BASE_URL, DEFAULT_CONTENT_URL, DEFAULT_USER_AGENT, JSON_MEDIA_TYPE, LOCALE_HEADER,
};
use crate::http::error_helpers::check_response;
use crate::http::loud_wire;
use crate::http::transport::{HttpTransport, RawResponse, ReqwestTransport, RpcRequest};
use crate::users::UsersService;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// A decoded RPC result together with the status and headers of the
/// response it came from.
#[derive(Debug, Clone)]
pub struct RpcResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub value: T,
}

impl<T> RpcResponse<T> {
    /// Discards the response metadata.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Transforms the decoded value, keeping the metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RpcResponse<U> {
        RpcResponse {
            status: self.status,
            headers: self.headers,
            value: f(self.value),
        }
    }
}

/// The main client for the Dropbox RPC API.
///
/// A `Client` holds configuration and a shared transport only; it keeps no
/// per-call state, so clones can be used from many tasks at once.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    content_url: Url,
    user_agent: String,
    locale: String,
}

/// Builder for `Client` instances.
///
/// # Example
///
/// ```
/// use dropbox_rs::Client;
///
/// let client = Client::builder()
///     .base_url("https://api.example.com/")
///     .user_agent("my-app/1.0")
///     .locale("es")
///     .build()
///     .unwrap();
/// assert_eq!(client.user_agent(), "my-app/1.0");
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    transport: Option<Arc<dyn HttpTransport>>,
    base_url: Option<String>,
    content_url: Option<String>,
    user_agent: Option<String>,
    locale: Option<String>,
}

impl ClientBuilder {
    /// Sets the transport used to reach the API.
    ///
    /// If not set, a [`ReqwestTransport`] over a default `reqwest::Client`
    /// is used, which sends no credentials.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Uses a pre-configured `reqwest::Client`, typically one that already
    /// attaches an `Authorization` header.
    #[must_use]
    pub fn http_client(self, http_client: reqwest::Client) -> Self {
        self.transport(Arc::new(ReqwestTransport::new(http_client)))
    }

    /// Base URL that RPC paths are resolved against.
    ///
    /// Keep the trailing slash if the base has a path component; relative
    /// resolution replaces the last path segment otherwise.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Base URL for content-transfer endpoints.
    #[must_use]
    pub fn content_url(mut self, url: impl Into<String>) -> Self {
        self.content_url = Some(url.into());
        self
    }

    /// User agent sent with every request. An empty string omits the header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// IETF language tag for user-facing text in API responses. Empty (the
    /// default) sends nothing.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Builds the `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::UrlParse`] if a configured URL is invalid.
    pub fn build(self) -> Result<Client> {
        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let content_url = Url::parse(self.content_url.as_deref().unwrap_or(DEFAULT_CONTENT_URL))?;
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::default()));

        Ok(Client {
            transport,
            base_url,
            content_url,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            locale: self.locale.unwrap_or_default(),
        })
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new builder for `Client` instances.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Creates a client for the production API with an unauthenticated
    /// default transport.
    #[must_use]
    pub fn new() -> Self {
        // The defaults are compile-time constants and always parse
        Self::builder()
            .build()
            .expect("default client configuration is valid")
    }

    /// Creates a client for the production API over a pre-configured
    /// `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(http_client: reqwest::Client) -> Self {
        Self::builder()
            .http_client(http_client)
            .build()
            .expect("default client configuration is valid")
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub const fn content_url(&self) -> &Url {
        &self.content_url
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// # Errors
    ///
    /// Returns [`DropboxError::UrlParse`] and leaves the client unchanged if
    /// `url` is invalid.
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        self.base_url = Url::parse(url)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`DropboxError::UrlParse`] and leaves the client unchanged if
    /// `url` is invalid.
    pub fn set_content_url(&mut self, url: &str) -> Result<()> {
        self.content_url = Url::parse(url)?;
        Ok(())
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    // --- Service facades ---

    /// Account-related endpoints.
    #[must_use]
    pub const fn users(&self) -> UsersService<'_> {
        UsersService::new(self)
    }

    /// File and folder endpoints.
    #[must_use]
    pub const fn files(&self) -> FilesService<'_> {
        FilesService::new(self)
    }

    // --- Request building ---

    /// Builds an RPC request.
    ///
    /// `url` is resolved against the base URL; give relative paths without a
    /// leading slash (`"2-beta/files/list_folder"`) so they extend the base
    /// path. `body`, if present, is encoded as JSON.
    ///
    /// Every request carries `Accept: application/json; charset=utf-8`. A
    /// body adds the matching `Content-Type`. `User-Agent` and the locale
    /// header are only sent when configured non-empty.
    ///
    /// # Errors
    ///
    /// - [`DropboxError::UrlParse`] if `url` cannot be parsed
    /// - [`DropboxError::Serialization`] if `body` cannot be encoded as JSON
    /// - [`DropboxError::InvalidHeader`] if the user agent or locale is not a
    ///   valid header value
    pub fn new_rpc_request<B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<RpcRequest>
    where
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        if !self.user_agent.is_empty() {
            headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        }
        if !self.locale.is_empty() {
            headers.insert(
                HeaderName::from_static(LOCALE_HEADER),
                HeaderValue::from_str(&self.locale)?,
            );
        }

        let body = match body {
            Some(value) => {
                let encoded = serde_json::to_vec(value)?;
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
                Some(Bytes::from(encoded))
            }
            None => None,
        };

        Ok(RpcRequest {
            method,
            url,
            headers,
            body,
        })
    }

    // --- Execution ---

    /// Sends an RPC request and decodes a successful JSON response into `T`.
    ///
    /// # Errors
    ///
    /// - [`DropboxError::Transport`] if no response was received
    /// - [`DropboxError::Remote`] / [`DropboxError::Unexpected`] for non-2xx
    ///   responses (see [`check_response`])
    /// - [`DropboxError::Io`] if the body could not be read
    /// - [`DropboxError::Serialization`] if the body is not a valid `T`
    pub async fn do_rpc<T: DeserializeOwned>(&self, request: RpcRequest) -> Result<RpcResponse<T>> {
        let request_id = loud_wire::next_request_id();
        let result = match self.exchange(request_id, request).await {
            Ok(response) => decode_json(request_id, response).await,
            Err(e) => Err(e),
        };
        result.inspect_err(|e| loud_wire::log_error(request_id, e))
    }

    /// Sends an RPC request and ignores the body of a successful response.
    ///
    /// # Errors
    ///
    /// Same as [`do_rpc`](Self::do_rpc), minus body decoding.
    pub async fn do_rpc_discard(&self, request: RpcRequest) -> Result<RpcResponse<()>> {
        let request_id = loud_wire::next_request_id();
        let RawResponse {
            status,
            headers,
            body,
        } = self
            .exchange(request_id, request)
            .await
            .inspect_err(|e| loud_wire::log_error(request_id, e))?;
        drop(body);

        Ok(RpcResponse {
            status,
            headers,
            value: (),
        })
    }

    /// One transport round-trip followed by status classification.
    async fn exchange(&self, request_id: usize, request: RpcRequest) -> Result<RawResponse> {
        debug!("RPC {} {}", request.method, request.url);
        loud_wire::log_request(
            request_id,
            request.method.as_str(),
            request.url.as_str(),
            request.body.as_deref(),
        );

        let response = self
            .transport
            .send(request)
            .await
            .map_err(DropboxError::Transport)?;

        debug!("RPC response: HTTP {}", response.status);
        loud_wire::log_response_status(request_id, response.status.as_u16());

        check_response(response).await
    }
}

async fn decode_json<T: DeserializeOwned>(
    request_id: usize,
    response: RawResponse,
) -> Result<RpcResponse<T>> {
    let RawResponse {
        status,
        headers,
        body,
    } = response;
    let bytes = body.bytes().await?;
    loud_wire::log_response_body(request_id, &bytes);
    let value = serde_json::from_slice(&bytes)?;

    Ok(RpcResponse {
        status,
        headers,
        value,
    })
}

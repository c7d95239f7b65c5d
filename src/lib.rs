//! # dropbox-rs
//!
//! A small async client for the Dropbox RPC API.
//!
//! The crate builds JSON RPC requests, sends them through a pluggable
//! [`HttpTransport`], classifies failed responses by content type, and
//! follows listing cursors across pages. Only two endpoints are modeled:
//! [`UsersService::get_current_account`] and [`FilesService::list_folder`].
//!
//! Credentials are not managed here. Supply a `reqwest::Client` that already
//! attaches an `Authorization` header:
//!
//! ```no_run
//! use dropbox_rs::Client;
//! use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(AUTHORIZATION, HeaderValue::from_str("Bearer <token>")?);
//! let http = reqwest::Client::builder().default_headers(headers).build()?;
//!
//! let client = Client::with_http_client(http);
//! let listing = client.files().list_folder("").await?;
//! for entry in &listing.value {
//!     println!("{}", entry.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Set `LOUD_WIRE=1` to dump every request and response to stderr.

// Declare the modules
mod client;
mod errors;
mod files;
mod http;
mod pagination;
mod users;

// Client and execution
pub use client::{Client, ClientBuilder, RpcResponse};

// Errors
pub use errors::{DropboxError, Result};

// Transport boundary
pub use http::common::{ApiVersion, Endpoint};
pub use http::error_helpers::check_response;
pub use http::transport::{
    HttpTransport, RawResponse, ReqwestTransport, ResponseBody, RpcRequest, TransportError,
};

// Pagination
pub use pagination::{Page, collect_pages, flatten_pages, paginate};

// Service facades and their wire types
pub use files::{Entry, FilesService, ListFolderArg, ListFolderFooter, ListFolderResponse};
pub use users::{AccountInfo, Name, UsersService};

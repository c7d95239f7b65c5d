//! File and folder endpoints.

use crate::client::{Client, RpcResponse};
use crate::errors::Result;
use crate::http::common::Endpoint;
use crate::pagination::{self, Page};
use futures_util::Stream;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

/// A file or folder in a listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The last component of the path, including extension.
    pub name: String,
}

/// Request body for `files/list_folder`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFolderArg {
    /// Folder path; the empty string is the root.
    pub path: String,
    /// Continuation cursor from a previous page. Omitted on the wire when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cursor: String,
}

/// Pagination state returned with each listing page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFolderFooter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// One page of a folder listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFolderResponse {
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub footer: ListFolderFooter,
}

impl ListFolderResponse {
    /// Cursor to request the next page with, or `None` when this is the last
    /// page. A non-empty cursor is only honoured when `has_more` is set.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        if !self.footer.has_more {
            return None;
        }
        self.footer.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

impl From<RpcResponse<ListFolderResponse>> for Page<Entry> {
    fn from(response: RpcResponse<ListFolderResponse>) -> Self {
        let next_cursor = response.value.next_cursor().map(str::to_string);
        Self {
            items: response.value.entries,
            next_cursor,
            status: response.status,
            headers: response.headers,
        }
    }
}

/// Facade for `files/*` RPC endpoints, borrowed from a [`Client`].
#[derive(Debug, Clone, Copy)]
pub struct FilesService<'a> {
    client: &'a Client,
}

impl<'a> FilesService<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Base URL for content-transfer endpoints (uploads and downloads).
    ///
    /// No content endpoint is modeled yet; this is exposed so callers can
    /// build their own requests against it.
    #[must_use]
    pub const fn content_url(&self) -> &'a Url {
        self.client.content_url()
    }

    /// Fetches a single page of a folder listing.
    ///
    /// Pass an empty `cursor` for the first page.
    ///
    /// # Errors
    ///
    /// Any error from request building or execution; see [`Client::do_rpc`].
    pub async fn list_folder_page(
        &self,
        path: &str,
        cursor: &str,
    ) -> Result<RpcResponse<ListFolderResponse>> {
        let arg = ListFolderArg {
            path: path.to_string(),
            cursor: cursor.to_string(),
        };
        tracing::debug!("Listing folder: path={:?}, has_cursor={}", path, !cursor.is_empty());

        let request = self
            .client
            .new_rpc_request(Method::POST, &Endpoint::ListFolder.path(), Some(&arg))?;
        let response: RpcResponse<ListFolderResponse> = self.client.do_rpc(request).await?;

        tracing::debug!(
            "Listed {} entries, has_more={}",
            response.value.entries.len(),
            response.value.footer.has_more
        );
        Ok(response)
    }

    /// Lazily fetches every page of a folder listing.
    pub fn list_folder_pages(
        &self,
        path: &str,
    ) -> impl Stream<Item = Result<Page<Entry>>> + use<'a> {
        let service = *self;
        let path = path.to_string();
        pagination::paginate(move |cursor: String| {
            let path = path.clone();
            async move {
                service
                    .list_folder_page(&path, &cursor)
                    .await
                    .map(Page::from)
            }
        })
    }

    /// Lazily yields every entry of a folder, fetching pages as needed.
    ///
    /// A failed page fetch is yielded as the final item.
    pub fn list_folder_stream(&self, path: &str) -> impl Stream<Item = Result<Entry>> + use<'a> {
        pagination::flatten_pages(self.list_folder_pages(path))
    }

    /// Lists every entry of a folder, following the cursor across pages.
    ///
    /// Entries keep the server's order. The returned status and headers are
    /// those of the last page.
    ///
    /// # Errors
    ///
    /// The first failed page fetch; entries gathered before it are discarded.
    pub async fn list_folder(&self, path: &str) -> Result<RpcResponse<Vec<Entry>>> {
        pagination::collect_pages(self.list_folder_pages(path)).await
    }
}

//! Cursor-based pagination.
//!
//! [`paginate`] drives a single-page fetch function through the cursor
//! chain and yields each page lazily. [`collect_pages`] accumulates a page
//! stream into one ordered list, and [`flatten_pages`] flattens it into a stream of
//! individual items.
//!
//! The loop is a two-state machine: `Fetching(cursor)` starting from the
//! empty cursor, and `Done` once a page reports no continuation. A failed
//! fetch ends the stream after yielding the error; the accumulating helpers
//! return only the error and drop whatever was gathered before it.

use crate::client::RpcResponse;
use crate::errors::Result;
use async_stream::try_stream;
use futures_util::{Stream, StreamExt};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use std::future::Future;

/// One page of results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page, `None` when this is the last page.
    pub next_cursor: Option<String>,
    pub status: StatusCode,
    pub headers: HeaderMap,
}

enum State {
    Fetching(String),
    Done,
}

/// Fetches pages until the server stops returning a continuation cursor.
///
/// `fetch` receives the cursor to send; the first call gets an empty string.
/// A page whose `next_cursor` is `None` or empty ends the stream. The stream
/// is finite and cannot be restarted.
pub fn paginate<'a, T, F, Fut>(mut fetch: F) -> impl Stream<Item = Result<Page<T>>> + 'a
where
    T: 'a,
    F: FnMut(String) -> Fut + 'a,
    Fut: Future<Output = Result<Page<T>>> + 'a,
{
    try_stream! {
        let mut state = State::Fetching(String::new());
        while let State::Fetching(cursor) = state {
            let page = fetch(cursor).await?;
            state = match page.next_cursor.as_deref() {
                Some(next) if !next.is_empty() => State::Fetching(next.to_string()),
                _ => State::Done,
            };
            tracing::debug!(
                "fetched page with {} items, more={}",
                page.items.len(),
                matches!(state, State::Fetching(_))
            );
            yield page;
        }
    }
}

/// Drains a page stream, concatenating items in order.
///
/// The returned status and headers are those of the last page.
///
/// # Errors
///
/// Returns the first error yielded by `pages`; items already collected are
/// discarded.
pub async fn collect_pages<T, S>(pages: S) -> Result<RpcResponse<Vec<T>>>
where
    S: Stream<Item = Result<Page<T>>>,
{
    futures_util::pin_mut!(pages);

    let mut items = Vec::new();
    let mut last = None;
    while let Some(page) = pages.next().await {
        let page = page?;
        items.extend(page.items);
        last = Some((page.status, page.headers));
    }

    let (status, headers) = last.unwrap_or_default();
    Ok(RpcResponse {
        status,
        headers,
        value: items,
    })
}

/// Flattens a page stream into a lazy stream of items.
pub fn flatten_pages<'a, T, S>(pages: S) -> impl Stream<Item = Result<T>> + 'a
where
    T: 'a,
    S: Stream<Item = Result<Page<T>>> + 'a,
{
    try_stream! {
        for await page in pages {
            let page = page?;
            for item in page.items {
                yield item;
            }
        }
    }
}

//! Common test utilities shared across integration test files.
//!
//! Usage in test files:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! [`FakeTransport`] stands in for the network: it records every request it
//! receives and answers with responses scripted up front.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use dropbox_rs::{Client, HttpTransport, RawResponse, ResponseBody, RpcRequest, TransportError};
use futures_util::StreamExt;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_BASE_URL: &str = "https://api.test/";

/// Scripted in-memory transport.
#[derive(Debug, Default)]
pub struct FakeTransport {
    requests: Mutex<Vec<RpcRequest>>,
    responses: Mutex<VecDeque<Result<RawResponse, String>>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a response for the next unanswered request.
    pub fn push_response(&self, response: RawResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queues a transport failure for the next unanswered request.
    pub fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<RpcRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: RpcRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => Err("no scripted response left".into()),
        }
    }
}

/// Builds a client that talks to `transport` with a fixed base URL.
pub fn client_with(transport: &Arc<FakeTransport>) -> Client {
    Client::builder()
        .transport(transport.clone())
        .base_url(TEST_BASE_URL)
        .build()
        .unwrap()
}

fn headers_with_content_type(content_type: Option<&'static str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    headers
}

/// A JSON response with the given status.
pub fn json_response(status: u16, value: &serde_json::Value) -> RawResponse {
    RawResponse::new(
        StatusCode::from_u16(status).unwrap(),
        headers_with_content_type(Some("application/json")),
        value.to_string(),
    )
}

/// Sets a flag when the body it is attached to is dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Observes whether a response body was released.
#[derive(Clone)]
pub struct ReleaseTracker(Arc<AtomicBool>);

impl ReleaseTracker {
    pub fn is_released(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A response whose body reports when it is dropped.
pub fn tracked_response(
    status: u16,
    content_type: Option<&'static str>,
    body: &'static str,
) -> (RawResponse, ReleaseTracker) {
    let released = Arc::new(AtomicBool::new(false));
    let guard = DropFlag(Arc::clone(&released));
    let stream = futures_util::stream::iter([Ok(Bytes::from_static(body.as_bytes()))]).map(
        move |chunk| {
            let _keep = &guard;
            chunk
        },
    );

    let response = RawResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers: headers_with_content_type(content_type),
        body: ResponseBody::from_stream(stream),
    };
    (response, ReleaseTracker(released))
}

/// Decodes a recorded request body as JSON.
pub fn request_json(request: &RpcRequest) -> serde_json::Value {
    let body = request.body.as_ref().expect("request has a body");
    serde_json::from_slice(body).unwrap()
}

/// A `files/list_folder` page payload.
pub fn list_folder_page(names: &[&str], cursor: Option<&str>, has_more: bool) -> serde_json::Value {
    let entries: Vec<_> = names
        .iter()
        .map(|name| serde_json::json!({ "name": name }))
        .collect();
    let mut footer = serde_json::json!({ "has_more": has_more });
    if let Some(cursor) = cursor {
        footer["cursor"] = serde_json::json!(cursor);
    }
    serde_json::json!({ "entries": entries, "footer": footer })
}

//! End-to-end tests of the reqwest transport against a local mock server.

use dropbox_rs::{Client, DropboxError};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_TOKEN: &str = "test-access-token";

/// Client pointed at the mock server, authenticated the way callers are
/// expected to: through the reqwest client's default headers.
fn client_for(server: &MockServer) -> Client {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {TEST_TOKEN}")).unwrap(),
    );
    let http = reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .unwrap();

    Client::builder()
        .http_client(http)
        .base_url(format!("{}/", server.uri()))
        .user_agent("dropbox-rs-tests/1.0")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_headers_reach_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2-beta/users/get_current_account"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(header("accept", "application/json; charset=utf-8"))
        .and(header("user-agent", "dropbox-rs-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account_id": "dbid:wire",
            "name": {"display_name": "Wire Test"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let account = client_for(&server)
        .users()
        .get_current_account()
        .await
        .unwrap();

    assert_eq!(account.value.account_id, "dbid:wire");
    assert_eq!(account.value.name.display_name, "Wire Test");
}

#[tokio::test]
async fn test_list_folder_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2-beta/files/list_folder"))
        .and(header_exists("content-type"))
        .and(body_json(json!({"path": "/photos"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{"name": "a.jpg"}, {"name": "b.jpg"}],
            "footer": {"cursor": "c1", "has_more": true}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2-beta/files/list_folder"))
        .and(body_json(json!({"path": "/photos", "cursor": "c1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{"name": "c.jpg"}],
            "footer": {"has_more": false}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client_for(&server)
        .files()
        .list_folder("/photos")
        .await
        .unwrap();

    let names: Vec<_> = listing.value.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
}

#[tokio::test]
async fn test_plain_text_error_from_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500).set_body_raw("db-error", "text/plain; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .users()
        .get_current_account()
        .await
        .unwrap_err();

    assert_eq!(err.reason(), Some("db-error"));
}

#[tokio::test]
async fn test_error_without_content_type_is_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .users()
        .get_current_account()
        .await
        .unwrap_err();

    assert!(matches!(err, DropboxError::Unexpected { .. }));
}

#[tokio::test]
async fn test_redirect_loop_surfaces_transport_error() {
    let server = MockServer::start().await;
    Mock::given(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = client
        .new_rpc_request::<()>(Method::POST, "loop", None)
        .unwrap();
    let err = client.do_rpc_discard(request).await.unwrap_err();

    match err {
        DropboxError::Transport(source) => {
            let reqwest_err = source
                .downcast_ref::<reqwest::Error>()
                .expect("transport error is a reqwest::Error");
            assert!(reqwest_err.is_redirect());
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

//! Integration tests for error normalization

use crate::mock_server::{unreachable_base_url, MockServerFixture};
use reel_client::types::Movie;
use reel_client::{ApiClient, ClientConfig, Error, ErrorKind, RequestOptions};
use serde_json::Value;

#[tokio::test]
async fn test_status_messages() {
    let cases = [
        (400, "Bad request - invalid parameters", false),
        (401, "Unauthorized - invalid API key", false),
        (403, "Forbidden - access denied", false),
        (418, "Request failed with status 418", false),
    ];
    let mut fixture = MockServerFixture::new().await;
    let client = fixture.client();

    for (status, message, retryable) in cases {
        let path = format!("/status/{}", status);
        let mock = fixture.mock_json("GET", &path, status, "{}", 1).await;
        let resp = client.get::<Value>(&path, RequestOptions::new()).await;
        mock.assert_async().await;

        let err = resp.error().unwrap();
        assert_eq!(err.message, message);
        assert_eq!(err.retryable, retryable);
        assert_eq!(err.http_status, Some(status as u16));
        assert_eq!(resp.http_status(), status as u16);
    }
}

#[tokio::test]
async fn test_network_failure_has_status_zero() {
    let client = ApiClient::new(
        ClientConfig::default()
            .with_base_url(unreachable_base_url())
            .with_retry_enabled(false),
    )
    .unwrap();

    let resp = client.get::<Value>("/movie/1", RequestOptions::new()).await;

    assert_eq!(resp.http_status(), 0);
    assert!(resp.data().is_none());
    let err = resp.error().unwrap();
    assert_eq!(err.message, "Network error - please check your connection");
    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(err.retryable);
    assert!(err.http_status.is_none());
}

#[tokio::test]
async fn test_body_that_does_not_fit_is_a_decode_error() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json("GET", "/movie/348", 200, r#"{"id":"not-a-number"}"#, 2)
        .await;
    let client = fixture.client();

    for _ in 0..2 {
        let resp = client.get::<Movie>("/movie/348", RequestOptions::new()).await;
        let err = resp.error().unwrap();
        assert_eq!(err.kind, ErrorKind::Decode);
        assert!(!err.retryable);
        assert_eq!(resp.http_status(), 200);
    }

    mock.assert_async().await;
    assert_eq!(client.cache_stats().size, 0);
}

#[tokio::test]
async fn test_non_json_body_is_returned_as_text() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json("GET", "/robots.txt", 200, "User-agent: *", 1).await;
    let client = fixture.client();

    let resp = client.get::<String>("/robots.txt", RequestOptions::new()).await;
    assert_eq!(resp.data().map(String::as_str), Some("User-agent: *"));
}

#[tokio::test]
async fn test_into_result_surfaces_api_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json("GET", "/movie/1", 403, "{}", 1).await;
    let client = fixture.client();

    let err = client
        .get::<Value>("/movie/1", RequestOptions::new())
        .await
        .into_result()
        .unwrap_err();
    match err {
        Error::Api(api) => assert_eq!(api.http_status, Some(403)),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_bad_base_url_fails_at_construction() {
    let err = ApiClient::new(ClientConfig::default().with_base_url("not a url")).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_bad_default_header_fails_at_construction() {
    let config = ClientConfig::default()
        .with_base_url("https://api.themoviedb.org/3")
        .with_header("X-Bad", "line\nbreak");
    assert!(matches!(ApiClient::new(config), Err(Error::Configuration { .. })));
}

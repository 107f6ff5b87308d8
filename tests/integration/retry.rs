//! Integration tests for retry and backoff

use crate::mock_server::{MockServerFixture, TEST_RETRY_BASE_DELAY};
use async_trait::async_trait;
use reel_client::client::ApiError;
use reel_client::interceptors::{Interceptor, RequestContext, ResponseContext};
use reel_client::{ApiClient, ErrorKind, RequestOptions};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

const SERVER_ERROR: &str = r#"{"status_message":"upstream unavailable"}"#;

#[tokio::test]
async fn test_recovers_after_transient_server_errors() {
    let mut fixture = MockServerFixture::new().await;
    let failing = fixture.mock_json("GET", "/discover/movie", 503, SERVER_ERROR, 3).await;
    let healthy = fixture
        .mock_json("GET", "/discover/movie", 200, r#"{"page":1,"results":[]}"#, 1)
        .await;
    let client = fixture.client();

    let started = Instant::now();
    let resp = client.get::<Value>("/discover/movie", RequestOptions::new()).await;
    let elapsed = started.elapsed();

    assert!(resp.is_success());
    assert_eq!(resp.http_status(), 200);
    failing.assert_async().await;
    healthy.assert_async().await;
    // base + 2*base + 4*base
    assert!(elapsed >= TEST_RETRY_BASE_DELAY * 7, "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_gives_up_after_max_retries() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json("GET", "/movie/1", 503, SERVER_ERROR, 3).await;
    let client = ApiClient::new(fixture.config().with_max_retries(2)).unwrap();

    let resp = client.get::<Value>("/movie/1", RequestOptions::new()).await;

    mock.assert_async().await;
    assert_eq!(resp.http_status(), 503);
    let err = resp.error().unwrap();
    assert_eq!(err.message, "Server error - please try again later");
    assert_eq!(err.kind, ErrorKind::Server);
    assert!(err.retryable);
    assert_eq!(err.details["status_message"], "upstream unavailable");
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json("GET", "/movie/999", 404, r#"{"status_code":34}"#, 1)
        .await;
    let client = fixture.client();

    let resp = client.get::<Value>("/movie/999", RequestOptions::new()).await;

    mock.assert_async().await;
    assert!(resp.data().is_none());
    assert_eq!(resp.http_status(), 404);
    let err = resp.error().unwrap();
    assert_eq!(err.message, "Resource not found");
    assert!(!err.retryable);
    assert_eq!(err.kind, ErrorKind::Client);
}

#[tokio::test]
async fn test_rate_limit_is_retried() {
    let mut fixture = MockServerFixture::new().await;
    let limited = fixture.mock_json("GET", "/search", 429, "{}", 1).await;
    let ok = fixture.mock_json("GET", "/search", 200, r#"{"items":[]}"#, 1).await;
    let client = fixture.client();

    let resp = client.get::<Value>("/search", RequestOptions::new()).await;

    limited.assert_async().await;
    ok.assert_async().await;
    assert!(resp.is_success());
}

#[tokio::test]
async fn test_retry_disabled_makes_one_attempt() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json("GET", "/movie/1", 500, SERVER_ERROR, 1).await;
    let client = ApiClient::new(fixture.config().with_retry_enabled(false)).unwrap();

    let resp = client.get::<Value>("/movie/1", RequestOptions::new()).await;

    mock.assert_async().await;
    assert_eq!(resp.http_status(), 500);
    assert!(resp.error().unwrap().retryable);
}

#[derive(Default)]
struct AttemptCounter {
    requests: AtomicUsize,
    errors: AtomicUsize,
    responses: AtomicUsize,
    request_ids: std::sync::Mutex<Vec<String>>,
}

#[async_trait]
impl Interceptor for AttemptCounter {
    async fn on_request(&self, ctx: &RequestContext) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.request_ids.lock().unwrap().push(ctx.request_id.clone());
    }

    async fn on_response(&self, _ctx: &RequestContext, _resp: &ResponseContext) {
        self.responses.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_error(&self, _ctx: &RequestContext, _resp: &ResponseContext, _err: &ApiError) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_interceptors_see_every_attempt() {
    let mut fixture = MockServerFixture::new().await;
    let _failing = fixture.mock_json("GET", "/videos", 502, "{}", 2).await;
    let _ok = fixture.mock_json("GET", "/videos", 200, r#"{"items":[]}"#, 1).await;

    let counter = Arc::new(AttemptCounter::default());
    let client = ApiClient::builder()
        .config(fixture.config())
        .interceptor(counter.clone())
        .build()
        .unwrap();

    let resp = client.get::<Value>("/videos", RequestOptions::new()).await;
    assert!(resp.is_success());
    assert_eq!(counter.requests.load(Ordering::SeqCst), 3);
    assert_eq!(counter.errors.load(Ordering::SeqCst), 2);
    assert_eq!(counter.responses.load(Ordering::SeqCst), 1);

    {
        let ids = counter.request_ids.lock().unwrap();
        assert!(ids.iter().all(|id| id == &ids[0]));
    }

    // Cache hits never reach the interceptors.
    let cached = client.get::<Value>("/videos", RequestOptions::new()).await;
    assert!(cached.served_from_cache());
    assert_eq!(counter.requests.load(Ordering::SeqCst), 3);
}

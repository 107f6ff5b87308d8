//! POST / PUT / DELETE never touch the cache

use crate::mock_server::MockServerFixture;
use mockito::Matcher;
use reel_client::{AuthScheme, RequestOptions};
use serde_json::{json, Value};

#[tokio::test]
async fn test_post_bypasses_cache() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/list")
        .match_body(Matcher::Json(json!({"name": "Watch later"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":7,"success":true}"#)
        .expect(2)
        .create_async()
        .await;
    let client = fixture.client();

    for _ in 0..2 {
        let resp = client
            .post::<Value, _>("/list", &json!({"name": "Watch later"}), RequestOptions::new())
            .await;
        assert_eq!(resp.http_status(), 201);
        assert!(!resp.served_from_cache());
        assert_eq!(resp.data().unwrap()["id"], 7);
    }

    mock.assert_async().await;
    assert_eq!(client.cache_stats().size, 0);
}

#[tokio::test]
async fn test_mutation_does_not_invalidate_cached_get() {
    let mut fixture = MockServerFixture::new().await;
    let get = fixture.mock_json("GET", "/list/7", 200, r#"{"items":[]}"#, 1).await;
    let put = fixture.mock_json("PUT", "/list/7", 200, r#"{"success":true}"#, 1).await;
    let client = fixture.client();

    client.get::<Value>("/list/7", RequestOptions::new()).await;
    let updated = client
        .put::<Value, _>("/list/7", &json!({"media_id": 348}), RequestOptions::new())
        .await;
    assert!(updated.is_success());
    let stale = client.get::<Value>("/list/7", RequestOptions::new()).await;
    assert!(stale.served_from_cache());

    get.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn test_delete_with_empty_body() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json("DELETE", "/list/7", 204, "", 1).await;
    let client = fixture.client();

    let resp = client.delete::<()>("/list/7", RequestOptions::new()).await;

    mock.assert_async().await;
    assert!(resp.is_success());
    assert_eq!(resp.http_status(), 204);
}

#[tokio::test]
async fn test_mutations_are_retried() {
    let mut fixture = MockServerFixture::new().await;
    let failing = fixture.mock_json("POST", "/rating", 503, "{}", 1).await;
    let ok = fixture.mock_json("POST", "/rating", 201, r#"{"success":true}"#, 1).await;
    let client = fixture.client();

    let resp = client
        .post::<Value, _>("/rating", &json!({"value": 8.5}), RequestOptions::new())
        .await;

    failing.assert_async().await;
    ok.assert_async().await;
    assert_eq!(resp.http_status(), 201);
}

#[tokio::test]
async fn test_auth_and_call_headers_are_sent() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/account")
        .match_header("authorization", "Bearer tmdb-token")
        .match_header("x-trace", "abc")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let client = fixture.client();
    client.set_auth_token("tmdb-token", AuthScheme::Bearer).unwrap();

    let resp = client
        .get::<Value>("/account", RequestOptions::new().header("X-Trace", "abc"))
        .await;

    mock.assert_async().await;
    assert!(resp.is_success());
}

#[tokio::test]
async fn test_call_header_replaces_default_value() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/account")
        .match_header("authorization", "Bearer per-call")
        .match_header("accept", "text/plain")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let client = fixture.client();
    client.set_auth_token("default", AuthScheme::Bearer).unwrap();

    let resp = client
        .get::<Value>(
            "/account",
            RequestOptions::new()
                .header("Authorization", "Bearer per-call")
                .header("Accept", "text/plain"),
        )
        .await;

    mock.assert_async().await;
    assert!(resp.is_success(), "{:?}", resp.error());
}

#[tokio::test]
async fn test_call_header_does_not_leak_into_later_requests() {
    let mut fixture = MockServerFixture::new().await;
    let per_call = fixture
        .server
        .mock("DELETE", "/session")
        .match_header("authorization", "Bearer per-call")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let default = fixture
        .server
        .mock("DELETE", "/session")
        .match_header("authorization", "Bearer default")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let client = fixture.client();
    client.set_auth_token("default", AuthScheme::Bearer).unwrap();

    let first = client
        .delete::<Value>(
            "/session",
            RequestOptions::new().header("Authorization", "Bearer per-call"),
        )
        .await;
    let second = client.delete::<Value>("/session", RequestOptions::new()).await;

    per_call.assert_async().await;
    default.assert_async().await;
    assert!(first.is_success());
    assert!(second.is_success());
}

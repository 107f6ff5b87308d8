//! Mock HTTP server setup for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use reel_client::{ApiClient, ClientConfig};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Base delay used by every fixture client so retry tests stay fast.
pub const TEST_RETRY_BASE_DELAY: Duration = Duration::from_millis(10);

/// Test fixture that owns a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        init_tracing();
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client config pointed at the mock server, with a short backoff.
    pub fn config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(5))
            .with_retry_base_delay(TEST_RETRY_BASE_DELAY)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.config()).expect("fixture client")
    }

    /// JSON response for any query string, expected exactly `hits` times.
    pub async fn mock_json(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        body: &str,
        hits: usize,
    ) -> Mock {
        self.server
            .mock(method, path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// GET mock that only matches when every `params` pair is in the query.
    pub async fn mock_get_with_query(
        &mut self,
        path: &str,
        params: &[(&str, &str)],
        body: &str,
        hits: usize,
    ) -> Mock {
        let matchers = params
            .iter()
            .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string()))
            .collect();
        self.server
            .mock("GET", path)
            .match_query(Matcher::AllOf(matchers))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }
}

/// A base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    "http://127.0.0.1:1".to_string()
}

/// Route client logs to the test harness; `RUST_LOG=reel_client=debug` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

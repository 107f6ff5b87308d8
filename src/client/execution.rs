//! 请求执行逻辑：单次尝试与带指数退避的重试循环。
//!
//! Request execution: single attempt plus the retry loop around it.

use crate::client::error_classification::classify;
use crate::client::policy::Decision;
use crate::client::{ApiClient, ApiError, RequestOptions};
use crate::interceptors::RequestContext;
use crate::transport::{OutboundRequest, RawResponse};
use reqwest::Method;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

impl ApiClient {
    /// Run attempts `0..=max_retries` until one succeeds or the policy gives up.
    ///
    /// Attempts are strictly sequential. Only the last classified error
    /// survives between attempts, and it is what the caller sees on failure.
    pub(crate) async fn execute_with_retry(
        &self,
        method: &Method,
        path: &str,
        options: &RequestOptions,
        body: Option<&Value>,
    ) -> Result<RawResponse, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let mut attempt: u32 = 0;
        loop {
            let ctx = RequestContext {
                request_id: request_id.clone(),
                method: method.as_str().to_string(),
                path: path.to_string(),
                attempt,
            };
            let err = match self.execute_once(&ctx, method, path, options, body).await {
                Ok(resp) => return Ok(resp),
                Err(err) => err,
            };

            match self.policy.decide(&err, attempt) {
                Decision::Retry { delay } => {
                    info!(
                        request_id = request_id.as_str(),
                        path,
                        attempt = attempt + 1,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Decision::Fail => return Err(err),
            }
        }
    }

    /// Single attempt (no retry), wrapped in the interceptor hooks.
    async fn execute_once(
        &self,
        ctx: &RequestContext,
        method: &Method,
        path: &str,
        options: &RequestOptions,
        body: Option<&Value>,
    ) -> Result<RawResponse, ApiError> {
        let request = OutboundRequest {
            method,
            path,
            params: &options.params,
            headers: &options.headers,
            body,
        };
        self.interceptors
            .execute(ctx, || async move {
                self.transport.send(request).await.map_err(classify)
            })
            .await
    }
}

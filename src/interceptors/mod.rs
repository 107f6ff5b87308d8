//! Interceptor hooks around every network attempt.
//!
//! Interceptors observe; they cannot change what a request does. The client
//! installs [`LoggingInterceptor`] by default, which records latency, path and
//! outcome for each attempt. Cache hits never reach the interceptors because
//! they never reach the network.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::client::ApiError;
use crate::transport::RawResponse;

/// Request context passed to interceptors.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Shared by every attempt of one logical request.
    pub request_id: String,
    pub method: String,
    pub path: String,
    /// 0-based attempt index.
    pub attempt: u32,
}

/// Response context passed to interceptors.
#[derive(Debug, Clone)]
pub struct ResponseContext {
    /// 0 when no response was received.
    pub http_status: u16,
    pub elapsed: Duration,
}

/// Interceptor trait for cross-cutting concerns (logging/metrics/audit).
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn on_request(&self, _ctx: &RequestContext) {}

    async fn on_response(&self, _ctx: &RequestContext, _resp: &ResponseContext) {}

    async fn on_error(&self, _ctx: &RequestContext, _resp: &ResponseContext, _err: &ApiError) {}
}

/// Logs every attempt through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInterceptor;

#[async_trait]
impl Interceptor for LoggingInterceptor {
    async fn on_response(&self, ctx: &RequestContext, resp: &ResponseContext) {
        info!(
            request_id = ctx.request_id.as_str(),
            method = ctx.method.as_str(),
            path = ctx.path.as_str(),
            attempt = ctx.attempt,
            http_status = resp.http_status,
            duration_ms = resp.elapsed.as_millis() as u64,
            "API request completed"
        );
    }

    async fn on_error(&self, ctx: &RequestContext, resp: &ResponseContext, err: &ApiError) {
        warn!(
            request_id = ctx.request_id.as_str(),
            method = ctx.method.as_str(),
            path = ctx.path.as_str(),
            attempt = ctx.attempt,
            http_status = resp.http_status,
            duration_ms = resp.elapsed.as_millis() as u64,
            error_kind = err.kind.name(),
            retryable = err.retryable,
            "API request failed: {}",
            err.message
        );
    }
}

/// A simple interceptor pipeline that runs hooks in order.
#[derive(Clone, Default)]
pub struct InterceptorPipeline {
    pub(crate) interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorPipeline {
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    pub fn with<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run hooks around a provided async function that performs one attempt.
    pub(crate) async fn execute<F, Fut>(
        &self,
        ctx: &RequestContext,
        f: F,
    ) -> Result<RawResponse, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RawResponse, ApiError>>,
    {
        for ic in &self.interceptors {
            ic.on_request(ctx).await;
        }

        let start = tokio::time::Instant::now();
        let outcome = f().await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(resp) => {
                let rc = ResponseContext {
                    http_status: resp.status,
                    elapsed,
                };
                for ic in &self.interceptors {
                    ic.on_response(ctx, &rc).await;
                }
                Ok(resp)
            }
            Err(err) => {
                let rc = ResponseContext {
                    http_status: err.http_status.unwrap_or(0),
                    elapsed,
                };
                for ic in &self.interceptors {
                    ic.on_error(ctx, &rc, &err).await;
                }
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for InterceptorPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorPipeline")
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

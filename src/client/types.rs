//! Request options and the response envelope.

use crate::error_code::ErrorKind;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Normalized failure carried inside an [`ApiResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable classification.
    pub message: String,
    /// Status of the response, when one was received.
    pub http_status: Option<u16>,
    /// Raw response body or underlying error message.
    pub details: Value,
    pub retryable: bool,
    pub kind: ErrorKind,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            http_status: None,
            details: Value::Null,
            retryable: kind.retryable(),
            kind,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = details.into();
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

/// Uniform result of every client operation.
///
/// Exactly one of `data` and `error` is present. The constructors are the only
/// way to build one, which keeps that true.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    data: Option<T>,
    error: Option<ApiError>,
    http_status: u16,
    served_from_cache: bool,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, http_status: u16) -> Self {
        Self {
            data: Some(data),
            error: None,
            http_status,
            served_from_cache: false,
        }
    }

    /// A cache hit: always reported as HTTP 200.
    pub fn cached(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            http_status: 200,
            served_from_cache: true,
        }
    }

    /// A failure; the status is the error's status, or 0 when no response arrived.
    pub fn failure(error: ApiError) -> Self {
        Self {
            data: None,
            http_status: error.http_status.unwrap_or(0),
            error: Some(error),
            served_from_cache: false,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    pub fn served_from_cache(&self) -> bool {
        self.served_from_cache
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn into_result(self) -> crate::Result<T> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(err)) => Err(err.into()),
            (None, None) => unreachable!("ApiResponse holds neither data nor error"),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResponse<U> {
        ApiResponse {
            data: self.data.map(f),
            error: self.error,
            http_status: self.http_status,
            served_from_cache: self.served_from_cache,
        }
    }
}

/// Per-call options for [`ApiClient`](super::ApiClient) requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query parameters, sent and keyed in this order.
    pub params: Vec<(String, String)>,
    /// Headers layered over the client's defaults.
    pub headers: Vec<(String, String)>,
    /// Overrides the client's `cache_enabled` (GET only).
    pub cache: Option<bool>,
    /// Lifetime of the cached response; `CacheTtl::MEDIUM` when unset (GET only).
    pub cache_ttl: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn cache(mut self, enabled: bool) -> Self {
        self.cache = Some(enabled);
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }
}

/// Form of the `Authorization` header produced by `set_auth_token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    #[default]
    Bearer,
    Basic,
    /// The token is sent as-is.
    ApiKey,
}

impl AuthScheme {
    pub fn header_value(&self, token: &str) -> String {
        match self {
            AuthScheme::Bearer => format!("Bearer {}", token),
            AuthScheme::Basic => format!("Basic {}", token),
            AuthScheme::ApiKey => token.to_string(),
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthScheme::Bearer => "Bearer",
            AuthScheme::Basic => "Basic",
            AuthScheme::ApiKey => "ApiKey",
        };
        f.write_str(name)
    }
}

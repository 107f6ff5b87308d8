//! Error classification logic

use crate::client::ApiError;
use crate::error_code::ErrorKind;
use crate::transport::AttemptError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Classify a failed attempt into the envelope error.
///
/// Status handling:
/// - 408/429 are client statuses that are still worth retrying
/// - 500/502/503/504 are transient server failures
/// - 400/401/403/404 are request errors that will fail the same way again
/// - any other status is retryable iff it is a 5xx
pub(crate) fn classify(failure: AttemptError) -> ApiError {
    match failure {
        AttemptError::NoResponse(err) => {
            ApiError::new(ErrorKind::Transport, "Network error - please check your connection")
                .with_details(err.to_string())
        }
        AttemptError::Setup(message) => {
            let text = if message.is_empty() {
                "Request setup error".to_string()
            } else {
                message.clone()
            };
            ApiError::new(ErrorKind::Setup, text).with_details(message)
        }
        AttemptError::Status { status, body } => classify_status(status, body),
    }
}

pub(crate) fn classify_status(status: u16, body: Value) -> ApiError {
    let (message, retryable) = match status {
        400 => ("Bad request - invalid parameters".to_string(), false),
        401 => ("Unauthorized - invalid API key".to_string(), false),
        403 => ("Forbidden - access denied".to_string(), false),
        404 => ("Resource not found".to_string(), false),
        408 => ("Request timeout - please try again later".to_string(), true),
        429 => ("Rate limit exceeded - please try again later".to_string(), true),
        500 | 502 | 503 | 504 => ("Server error - please try again later".to_string(), true),
        other => (format!("Request failed with status {}", other), other >= 500),
    };
    ApiError::new(ErrorKind::from_http_status(status), message)
        .with_status(status)
        .with_details(body)
        .with_retryable(retryable)
}

/// Decode a successful body into the caller's type.
pub(crate) fn decode<T: DeserializeOwned>(body: &Value, status: u16) -> Result<T, ApiError> {
    T::deserialize(body).map_err(|e| {
        ApiError::new(ErrorKind::Decode, "Response body could not be decoded")
            .with_status(status)
            .with_details(e.to_string())
    })
}

/// Errors for request bodies that cannot be serialized; no attempt is made.
pub(crate) fn body_error(err: serde_json::Error) -> ApiError {
    classify(AttemptError::Setup(format!("request body could not be serialized: {}", err)))
}

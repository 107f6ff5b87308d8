//! 错误分类：请求失败的五种类别及其默认重试语义。
//!
//! Failure taxonomy for outbound requests.
//!
//! Every failed request lands in exactly one [`ErrorKind`]. The kind decides the
//! default retry semantics; individual HTTP statuses may refine it (a 408 or 429
//! is a client-side status that is still worth retrying).
//!
//! | Kind        | Meaning                                            | Default retryable |
//! |-------------|----------------------------------------------------|-------------------|
//! | `transport` | No response received (connect failure, timeout)    | yes               |
//! | `client`    | 4xx response                                       | no                |
//! | `server`    | 5xx response                                       | yes               |
//! | `setup`     | Request could not be built or sent                 | no                |
//! | `decode`    | 2xx response whose body does not fit the caller's type | no            |
//!
//! ## Example
//!
//! ```rust
//! use reel_client::error_code::ErrorKind;
//!
//! let kind = ErrorKind::from_http_status(503);
//! assert_eq!(kind, ErrorKind::Server);
//! assert!(kind.retryable());
//! assert_eq!(kind.name(), "server");
//! ```

use serde::Serialize;
use std::fmt;

/// Category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No response was received (network failure, timeout, broken body stream).
    Transport,
    /// The server answered with a 4xx status.
    Client,
    /// The server answered with a 5xx status.
    Server,
    /// The request never left the client.
    Setup,
    /// A successful response carried a body the caller's type could not accept.
    Decode,
}

impl ErrorKind {
    /// Returns the standard name (e.g., `"transport"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Client => "client",
            Self::Server => "server",
            Self::Setup => "setup",
            Self::Decode => "decode",
        }
    }

    /// Returns whether this kind of failure is retryable by default.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Transport | Self::Server)
    }

    /// Maps an HTTP error status to its kind. Anything below 500 is a client error.
    pub fn from_http_status(status: u16) -> Self {
        if status >= 500 {
            Self::Server
        } else {
            Self::Client
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

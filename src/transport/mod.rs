//! HTTP transport: the only place that talks to reqwest.

mod http;

pub use http::{HttpTransport, TransportError};
pub(crate) use http::{parse_headers, AttemptError, OutboundRequest, RawResponse};

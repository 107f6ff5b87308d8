use crate::client::ClientConfig;
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Proxy};
use serde_json::Value;
use std::sync::RwLock;

/// One outbound attempt, fully described.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OutboundRequest<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub params: &'a [(String, String)],
    pub headers: &'a [(String, String)],
    pub body: Option<&'a Value>,
}

/// A 2xx response with its body parsed as JSON (or kept as a string when it is not JSON).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: Value,
}

/// Why a single attempt failed, before classification.
#[derive(Debug, thiserror::Error)]
pub(crate) enum AttemptError {
    /// The request could not be built, so it never left the client.
    #[error("{0}")]
    Setup(String),

    /// No response came back.
    #[error("{0}")]
    NoResponse(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}")]
    Status { status: u16, body: Value },
}

impl AttemptError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() {
            AttemptError::Setup(err.to_string())
        } else {
            AttemptError::NoResponse(err)
        }
    }
}

/// reqwest-backed transport with a base URL, a per-attempt timeout, and
/// default headers that can be amended after construction.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    default_headers: RwLock<HeaderMap>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.is_empty() {
            url::Url::parse(&base_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid base URL '{}'", config.base_url),
                    ErrorContext::new()
                        .with_field_path("config.base_url")
                        .with_details(e.to_string())
                        .with_source("http_transport"),
                )
            })?;
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.extend(parse_headers(&config.default_headers, "config.default_headers")?);

        let mut builder = reqwest::Client::builder().timeout(config.timeout);

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy URL '{}'", proxy_url),
                    ErrorContext::new()
                        .with_field_path("config.proxy_url")
                        .with_details(e.to_string())
                        .with_source("http_transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(TransportError::Http)?;

        Ok(Self {
            client,
            base_url,
            default_headers: RwLock::new(headers),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Snapshot of the headers sent with every request.
    pub fn default_headers(&self) -> HeaderMap {
        self.default_headers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Merges `headers` into the defaults; existing names are replaced.
    pub fn merge_headers(&self, headers: HeaderMap) {
        self.default_headers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend(headers);
    }

    pub(crate) fn resolve_url(&self, path: &str) -> String {
        if self.base_url.is_empty() || path.starts_with("http://") || path.starts_with("https://")
        {
            return path.to_string();
        }
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Defaults overlaid with per-call headers; a call header replaces every
    /// default value of the same name.
    pub(crate) fn request_headers(
        &self,
        overrides: &[(String, String)],
    ) -> std::result::Result<HeaderMap, AttemptError> {
        let mut headers = self.default_headers();
        for (name, value) in overrides {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AttemptError::Setup(format!("invalid header name '{}': {}", name, e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| AttemptError::Setup(format!("invalid value for header '{}': {}", name, e)))?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }

    pub(crate) async fn send(
        &self,
        request: OutboundRequest<'_>,
    ) -> std::result::Result<RawResponse, AttemptError> {
        let url = self.resolve_url(request.path);
        let headers = self.request_headers(request.headers)?;
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers);

        if !request.params.is_empty() {
            builder = builder.query(request.params);
        }
        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(AttemptError::from_reqwest)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(AttemptError::NoResponse)?;
        let body = parse_body(text);

        if (200..300).contains(&status) {
            Ok(RawResponse { status, body })
        } else {
            Err(AttemptError::Status { status, body })
        }
    }
}

/// Parses `(name, value)` pairs into a header map, failing on the first invalid one.
pub(crate) fn parse_headers<'a, I>(headers: I, field_path: &str) -> Result<HeaderMap>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid header name '{}'", name),
                ErrorContext::new()
                    .with_field_path(field_path)
                    .with_details(e.to_string()),
            )
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid value for header '{}'", name),
                ErrorContext::new()
                    .with_field_path(format!("{}.{}", field_path, name))
                    .with_details(e.to_string()),
            )
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

/// Failure to set up the underlying HTTP client itself.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

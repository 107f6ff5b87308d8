use crate::cache::{CacheBackend, CacheKeyGenerator, CacheStats, CacheTtl};
use crate::client::error_classification::{body_error, decode};
use crate::client::policy::RetryPolicy;
use crate::client::{ApiClientBuilder, ApiResponse, AuthScheme, ClientConfig, RequestOptions};
use crate::interceptors::InterceptorPipeline;
use crate::transport::{parse_headers, HttpTransport, RawResponse};
use crate::Result;
use base64::Engine;
use regex::Regex;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// HTTP client with response caching, retry, and error normalization.
///
/// Every request method returns an [`ApiResponse`] and never fails: transport
/// and HTTP failures become the envelope's `error`.
pub struct ApiClient {
    pub(crate) config: ClientConfig,
    pub(crate) transport: HttpTransport,
    pub(crate) cache: Arc<dyn CacheBackend>,
    pub(crate) keys: CacheKeyGenerator,
    pub(crate) policy: RetryPolicy,
    pub(crate) interceptors: InterceptorPipeline,
}

impl ApiClient {
    /// Create a client with its own cache of `config.cache_capacity` entries.
    pub fn new(config: ClientConfig) -> Result<Self> {
        ApiClientBuilder::new().config(config).build()
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The cache backing this client, for sharing with another client.
    pub fn cache(&self) -> Arc<dyn CacheBackend> {
        Arc::clone(&self.cache)
    }

    /// GET `path`, served from the cache when a live entry exists.
    ///
    /// Successful non-empty bodies are cached under the path and parameters for
    /// `options.cache_ttl` (default [`CacheTtl::MEDIUM`]).
    pub async fn get<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> ApiResponse<T> {
        let use_cache = options.cache.unwrap_or(self.config.cache_enabled);
        let ttl = options.cache_ttl.unwrap_or(CacheTtl::MEDIUM);
        let key = self.keys.generate(path, &options.params);

        if use_cache {
            if let Some(cached) = self.cache.get(&key) {
                match T::deserialize(&cached) {
                    Ok(data) => {
                        debug!(path, key = key.as_str(), "cache hit");
                        return ApiResponse::cached(data);
                    }
                    Err(e) => {
                        debug!(path, key = key.as_str(), error = %e, "cached value does not fit, refetching");
                    }
                }
            }
        }

        let raw = match self.execute_with_retry(&Method::GET, path, &options, None).await {
            Ok(raw) => raw,
            Err(err) => return ApiResponse::failure(err),
        };
        let RawResponse { status, body } = raw;
        match decode::<T>(&body, status) {
            Ok(data) => {
                if use_cache && has_body(&body) {
                    self.cache.set(&key, body, ttl);
                }
                ApiResponse::success(data, status)
            }
            Err(err) => ApiResponse::failure(err),
        }
    }

    /// POST a JSON body. Never cached; does not invalidate cached GETs.
    pub async fn post<T, B>(&self, path: &str, body: &B, options: RequestOptions) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.mutate(Method::POST, path, Some(body), options).await
    }

    /// PUT a JSON body. Never cached; does not invalidate cached GETs.
    pub async fn put<T, B>(&self, path: &str, body: &B, options: RequestOptions) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.mutate(Method::PUT, path, Some(body), options).await
    }

    /// DELETE `path`. Never cached; does not invalidate cached GETs.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> ApiResponse<T> {
        self.mutate::<T, ()>(Method::DELETE, path, None, options).await
    }

    async fn mutate<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = match body.map(serde_json::to_value).transpose() {
            Ok(body) => body,
            Err(e) => return ApiResponse::failure(body_error(e)),
        };
        match self
            .execute_with_retry(&method, path, &options, body.as_ref())
            .await
        {
            Ok(RawResponse { status, body }) => match decode::<T>(&body, status) {
                Ok(data) => ApiResponse::success(data, status),
                Err(err) => ApiResponse::failure(err),
            },
            Err(err) => ApiResponse::failure(err),
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Drop every cached entry whose key matches `pattern` anywhere.
    ///
    /// A malformed pattern is a programming error and is returned as such.
    pub fn invalidate_cache(&self, pattern: &str) -> Result<usize> {
        let regex = Regex::new(pattern)?;
        Ok(self.cache.invalidate(&regex))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Merge headers into the defaults sent with every later request.
    pub fn set_headers<I, K, V>(&self, headers: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let headers: HashMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let parsed = parse_headers(&headers, "headers")?;
        self.transport.merge_headers(parsed);
        Ok(())
    }

    /// Set the `Authorization` header for every later request.
    pub fn set_auth_token(&self, token: &str, scheme: AuthScheme) -> Result<()> {
        self.set_headers([("Authorization", scheme.header_value(token))])
    }

    /// `Authorization: Basic base64(user:password)`.
    pub fn set_basic_auth(&self, user: &str, password: &str) -> Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, password));
        self.set_auth_token(&encoded, AuthScheme::Basic)
    }
}

/// Whether a body is worth caching: null, `false`, `0` and `""` are not.
fn has_body(body: &Value) -> bool {
    match body {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.transport.base_url())
            .field("cache", &self.cache.name())
            .field("policy", &self.policy)
            .field("interceptors", &self.interceptors)
            .finish()
    }
}

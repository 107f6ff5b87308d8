use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Client configuration. Fixed once the client is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Prefix for every request path. Empty means paths must be absolute URLs.
    pub base_url: String,
    /// Bound on each individual attempt.
    pub timeout: Duration,
    /// Sent with every request, over `Content-Type`/`Accept: application/json`.
    pub default_headers: HashMap<String, String>,
    pub cache_enabled: bool,
    pub retry_enabled: bool,
    /// Retries after the first attempt; `3` means up to 4 attempts.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each later one.
    pub retry_base_delay: Duration,
    /// Capacity of the cache created when none is injected.
    pub cache_capacity: usize,
    /// Namespace for this client's cache keys.
    pub cache_key_prefix: Option<String>,
    pub proxy_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_millis(10_000),
            default_headers: HashMap::new(),
            cache_enabled: true,
            retry_enabled: true,
            max_retries: 3,
            retry_base_delay: Duration::from_millis(1_000),
            cache_capacity: crate::cache::DEFAULT_CAPACITY,
            cache_key_prefix: None,
            proxy_url: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `REEL_*` environment variables.
    ///
    /// - `REEL_HTTP_TIMEOUT_MS`
    /// - `REEL_MAX_RETRIES`
    /// - `REEL_RETRY_BASE_DELAY_MS`
    /// - `REEL_RETRY_ENABLED` / `REEL_CACHE_ENABLED` (`1`/`0`, `true`/`false`)
    /// - `REEL_CACHE_CAPACITY`
    /// - `REEL_PROXY_URL`
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| env::var(name).ok())
    }

    pub(crate) fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |name: &str| lookup(name).and_then(|s| s.trim().parse::<u64>().ok());
        let flag = |name: &str| {
            lookup(name).and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Some(true),
                "0" | "false" | "no" | "off" => Some(false),
                _ => None,
            })
        };

        if let Some(ms) = number("REEL_HTTP_TIMEOUT_MS").filter(|ms| *ms > 0) {
            self.timeout = Duration::from_millis(ms);
        }
        if let Some(n) = number("REEL_MAX_RETRIES") {
            self.max_retries = u32::try_from(n).unwrap_or(u32::MAX);
        }
        if let Some(ms) = number("REEL_RETRY_BASE_DELAY_MS") {
            self.retry_base_delay = Duration::from_millis(ms);
        }
        if let Some(enabled) = flag("REEL_RETRY_ENABLED") {
            self.retry_enabled = enabled;
        }
        if let Some(enabled) = flag("REEL_CACHE_ENABLED") {
            self.cache_enabled = enabled;
        }
        if let Some(n) = number("REEL_CACHE_CAPACITY") {
            self.cache_capacity = usize::try_from(n).unwrap_or(usize::MAX);
        }
        if let Some(url) = lookup("REEL_PROXY_URL").filter(|s| !s.trim().is_empty()) {
            self.proxy_url = Some(url);
        }
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_retry_enabled(mut self, enabled: bool) -> Self {
        self.retry_enabled = enabled;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_cache_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cache_key_prefix = Some(prefix.into());
        self
    }

    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }
}

use crate::cache::{CacheBackend, CacheKeyGenerator, MemoryCache};
use crate::client::core::ApiClient;
use crate::client::policy::RetryPolicy;
use crate::client::ClientConfig;
use crate::interceptors::{Interceptor, InterceptorPipeline, LoggingInterceptor};
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;

/// Builder for creating clients with custom configuration.
///
/// Keep this surface area small and predictable (developer-friendly).
pub struct ApiClientBuilder {
    config: ClientConfig,
    cache: Option<Arc<dyn CacheBackend>>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    logging: bool,
}

impl ApiClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            cache: None,
            interceptors: Vec::new(),
            logging: true,
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing cache instead of creating a private one.
    ///
    /// Clients sharing a cache should each set a distinct `cache_key_prefix`.
    pub fn cache(mut self, cache: Arc<dyn CacheBackend>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Add an interceptor; they run in the order added, after the logging one.
    pub fn interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Install the default [`LoggingInterceptor`] (on unless disabled).
    pub fn logging(mut self, enable: bool) -> Self {
        self.logging = enable;
        self
    }

    /// Build the client. Fails only on configuration that can never work.
    pub fn build(self) -> Result<ApiClient> {
        let transport = HttpTransport::new(&self.config)?;

        let cache: Arc<dyn CacheBackend> = match self.cache {
            Some(cache) => cache,
            None => Arc::new(MemoryCache::new(self.config.cache_capacity)),
        };

        let mut keys = CacheKeyGenerator::new();
        if let Some(prefix) = &self.config.cache_key_prefix {
            keys = keys.with_prefix(prefix.clone());
        }

        let mut interceptors = InterceptorPipeline::new();
        if self.logging {
            interceptors = interceptors.with(LoggingInterceptor);
        }
        for ic in self.interceptors {
            interceptors.push(ic);
        }

        Ok(ApiClient {
            policy: RetryPolicy::from_config(&self.config),
            config: self.config,
            transport,
            cache,
            keys,
            interceptors,
        })
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

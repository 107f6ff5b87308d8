//! Cache key generation.

use std::fmt::Write;

/// Derives cache keys for GET requests.
///
/// A key is `[prefix:]path:params`, where `params` is a JSON object rendered
/// in the order the caller supplied the parameters. Two calls passing the same
/// parameters in a different order therefore produce different keys; call sites
/// build their parameters in a fixed order, so this only costs a cache miss.
#[derive(Debug, Clone, Default)]
pub struct CacheKeyGenerator {
    prefix: Option<String>,
}

impl CacheKeyGenerator {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Namespace every generated key, e.g. when several clients share one cache.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn generate(&self, path: &str, params: &[(String, String)]) -> String {
        let mut key = String::with_capacity(path.len() + 16);
        if let Some(ref p) = self.prefix {
            key.push_str(p);
            key.push(':');
        }
        key.push_str(path);
        key.push(':');
        if !params.is_empty() {
            key.push('{');
            for (i, (name, value)) in params.iter().enumerate() {
                if i > 0 {
                    key.push(',');
                }
                // serde_json string escaping keeps keys unambiguous for any input
                let _ = write!(
                    key,
                    "{}:{}",
                    serde_json::Value::from(name.as_str()),
                    serde_json::Value::from(value.as_str())
                );
            }
            key.push('}');
        }
        key
    }
}

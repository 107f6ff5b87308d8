//! Cache backend implementations.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    stored_at: Instant,
    ttl: Duration,
    /// Insertion order; orders entries written within the same clock tick.
    seq: u64,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) >= self.ttl
    }
}

/// Diagnostic snapshot of a cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub keys: Vec<String>,
}

/// Storage seam for response caching.
///
/// Operations are synchronous and never fail: absence is always a valid
/// outcome. Implementations are shared between clients via `Arc`, so they
/// must serialize their own read-modify-write sequences.
pub trait CacheBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value, ttl: Duration);
    fn delete(&self, key: &str) -> bool;
    fn clear(&self);
    /// Deletes every key the pattern matches anywhere in, returning how many went.
    fn invalidate(&self, pattern: &Regex) -> usize;
    fn stats(&self) -> CacheStats;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    next_seq: u64,
}

/// In-memory bounded cache with per-entry TTL.
///
/// When full, inserting a new key evicts the entry written longest ago,
/// whatever its remaining TTL. Eviction scans all entries, which is fine for
/// the tens-to-hundreds of entries a client cache holds.
#[derive(Debug)]
pub struct MemoryCache {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave a half-written entry behind,
        // so the map is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn evict_oldest(entries: &mut HashMap<String, CacheEntry>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, e)| (e.stored_at, e.seq))
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            entries.remove(&key);
            tracing::debug!(key = key.as_str(), "cache entry evicted");
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(super::DEFAULT_CAPACITY)
    }
}

impl CacheBackend for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.lock();
        let expired = inner.entries.get(key)?.is_expired(Instant::now());
        if expired {
            inner.entries.remove(key);
            return None;
        }
        inner.entries.get(key).map(|e| e.data.clone())
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.lock();
        if !inner.entries.contains_key(key) && inner.entries.len() >= self.capacity {
            Self::evict_oldest(&mut inner.entries);
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                data: value,
                stored_at: Instant::now(),
                ttl,
                seq,
            },
        );
    }

    fn delete(&self, key: &str) -> bool {
        self.lock().entries.remove(key).is_some()
    }

    fn clear(&self) {
        self.lock().entries.clear();
    }

    fn invalidate(&self, pattern: &Regex) -> usize {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|key, _| !pattern.is_match(key));
        before - inner.entries.len()
    }

    fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            size: inner.entries.len(),
            capacity: self.capacity,
            keys: inner.entries.keys().cloned().collect(),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

//! 响应缓存模块：带 TTL 过期与容量上限的内存缓存。
//!
//! # Response Caching Module
//!
//! Process-local memoization of GET responses, keyed by request path and
//! query parameters.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheBackend`] | Trait for cache storage shared between clients |
//! | [`MemoryCache`] | Bounded in-memory cache with per-entry TTL |
//! | [`CacheKeyGenerator`] | Cache key derivation from path and parameters |
//! | [`CacheTtl`] | Named TTL presets |
//!
//! ## Example
//!
//! ```rust
//! use reel_client::cache::{CacheBackend, CacheTtl, MemoryCache};
//! use serde_json::json;
//!
//! let cache = MemoryCache::new(100);
//! cache.set("movie:1", json!({"title": "Alien"}), CacheTtl::LONG);
//! assert_eq!(cache.get("movie:1"), Some(json!({"title": "Alien"})));
//!
//! let pattern = regex::Regex::new("^movie:").unwrap();
//! assert_eq!(cache.invalidate(&pattern), 1);
//! ```
//!
//! ## Sharing
//!
//! A single `Arc<MemoryCache>` may back several clients to cap total memory.
//! The cache does no namespacing of its own; give each client a distinct
//! `cache_key_prefix` so their keys cannot collide.

mod backend;
mod key;

pub use backend::{CacheBackend, CacheStats, MemoryCache};
pub use key::CacheKeyGenerator;

use std::time::Duration;

/// Capacity of the cache a client creates when none is injected.
pub const DEFAULT_CAPACITY: usize = 100;

/// Named cache lifetimes.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtl;

impl CacheTtl {
    pub const SHORT: Duration = Duration::from_secs(5 * 60);
    pub const MEDIUM: Duration = Duration::from_secs(30 * 60);
    pub const LONG: Duration = Duration::from_secs(60 * 60);
    pub const VERY_LONG: Duration = Duration::from_secs(6 * 60 * 60);
    pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);
}

//! 弹性 HTTP 客户端：缓存、重试与错误归一化的统一入口。
//!
//! # Resilient HTTP Client
//!
//! [`ApiClient`] is the single chokepoint for outbound calls. It applies the
//! response cache to GET requests, retries retryable failures with exponential
//! backoff, and folds every failure into the [`ApiResponse`] envelope.
//!
//! ## Request lifecycle (GET)
//!
//! 1. Derive the cache key from the path and parameters.
//! 2. Return a live cached body with `served_from_cache = true`.
//! 3. Otherwise dispatch, retrying per [`ClientConfig`].
//! 4. Cache a successful non-empty body for the call's TTL.
//! 5. On failure, classify the last error; nothing is cached.
//!
//! POST, PUT and DELETE go through the same retry loop but never touch the
//! cache. They do not invalidate cached GETs either: after a mutation that
//! changes what a cached GET would return, call
//! [`ApiClient::invalidate_cache`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use reel_client::client::{ApiClient, ClientConfig, RequestOptions};
//! use reel_client::cache::CacheTtl;
//!
//! # async fn run() -> reel_client::Result<()> {
//! let client = ApiClient::new(
//!     ClientConfig::default().with_base_url("https://api.themoviedb.org/3"),
//! )?;
//! let resp = client
//!     .get::<serde_json::Value>(
//!         "/genre/movie/list",
//!         RequestOptions::new().cache_ttl(CacheTtl::DAY),
//!     )
//!     .await;
//! if let Some(err) = resp.error() {
//!     eprintln!("{}", err.message);
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod core;
pub(crate) mod error_classification;
mod execution;
pub(crate) mod policy;
mod types;

pub use builder::ApiClientBuilder;
pub use config::ClientConfig;
pub use self::core::ApiClient;
pub use types::{ApiError, ApiResponse, AuthScheme, RequestOptions};

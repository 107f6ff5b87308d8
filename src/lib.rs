//! # reel-client
//!
//! 面向电影与预告片元数据的弹性 HTTP 客户端：统一的缓存、重试与错误归一化。
//!
//! Resilient HTTP client layer for movie and trailer metadata APIs.
//!
//! ## Overview
//!
//! Every outbound call goes through one [`ApiClient`], which gives the calling
//! code a single, predictable contract:
//!
//! - **Response cache**: GET bodies are kept in a bounded TTL cache; the oldest
//!   entry is evicted when a new key arrives at capacity.
//! - **Retry**: transport failures, 408, 429 and 5xx are retried with
//!   exponential backoff (`base * 2^attempt`).
//! - **Normalized errors**: nothing throws; every call returns an
//!   [`ApiResponse`] holding either data or a classified [`ApiError`].
//!
//! On top of the client sit two domain services, [`MovieService`] (TMDB) and
//! [`VideoService`] (YouTube), which pick per-endpoint cache lifetimes from
//! [`CacheTtl`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reel_client::{ClientConfig, MovieService};
//!
//! #[tokio::main]
//! async fn main() -> reel_client::Result<()> {
//!     let movies = MovieService::connect(ClientConfig::from_env(), "tmdb-read-token")?;
//!     for movie in movies.popular_movies(1).await {
//!         println!("{} ({})", movie.title, movie.release_date);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | `ApiClient`, its builder, config, and the response envelope |
//! | [`cache`] | TTL cache backend, key generation, lifetime presets |
//! | [`transport`] | reqwest-based HTTP transport |
//! | [`interceptors`] | Per-attempt hooks; request logging |
//! | [`services`] | TMDB and YouTube services |
//! | [`types`] | Movie and video payload types |
//! | [`error`] | Fail-loud construction and configuration errors |

pub mod cache;
pub mod client;
pub mod error;
pub mod error_code;
pub mod interceptors;
pub mod services;
pub mod transport;
pub mod types;

pub use cache::{CacheBackend, CacheTtl, MemoryCache};
pub use client::{ApiClient, ApiClientBuilder, ApiError, ApiResponse, AuthScheme, ClientConfig, RequestOptions};
pub use error::{Error, ErrorContext};
pub use error_code::ErrorKind;
pub use services::{MovieService, VideoService};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

//! 领域服务：基于 ApiClient 的电影与预告片查询。
//!
//! # Domain Services
//!
//! Thin wrappers that own an [`ApiClient`](crate::ApiClient) and map upstream
//! endpoints to typed results, each with its own cache lifetime:
//!
//! | Service | Upstream | Cache namespace |
//! |---------|----------|-----------------|
//! | [`MovieService`] | TMDB v3 | `tmdb` |
//! | [`VideoService`] | YouTube Data v3 | `youtube` |
//!
//! Services never surface transport failures to their callers; a failed
//! lookup is logged and yields an empty result. Use the underlying client
//! (via `client()`) when the envelope itself is needed.

pub mod movies;
pub mod videos;

pub use movies::MovieService;
pub use videos::{parse_iso8601_duration, VideoService};

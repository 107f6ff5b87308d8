//! TMDB v3 movie metadata.

use crate::cache::CacheTtl;
use crate::client::{ApiClient, ApiResponse, AuthScheme, ClientConfig, RequestOptions};
use crate::types::movie::{GenreList, VideoList};
use crate::types::{Genre, Movie, MovieDetail, MovieVideo, Paged};
use crate::{Error, ErrorContext, Result};
use tracing::warn;

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";

/// Movie catalog backed by TMDB.
///
/// List lookups degrade to an empty list when the request fails; the failure
/// is logged, not returned.
#[derive(Debug)]
pub struct MovieService {
    client: ApiClient,
}

impl MovieService {
    /// Wrap an already configured client (base URL and auth in place).
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Build a client from `config` authenticated with a TMDB read-access token.
    ///
    /// An empty `config.base_url` becomes [`TMDB_BASE_URL`], and an unset cache
    /// prefix becomes `tmdb`.
    pub fn connect(mut config: ClientConfig, token: &str) -> Result<Self> {
        if config.base_url.is_empty() {
            config.base_url = TMDB_BASE_URL.to_string();
        }
        if config.cache_key_prefix.is_none() {
            config.cache_key_prefix = Some("tmdb".to_string());
        }
        let client = ApiClient::new(config)?;
        client.set_auth_token(token, AuthScheme::Bearer)?;
        Ok(Self::new(client))
    }

    /// [`connect`](Self::connect) with `REEL_*` config and the token from `TMDB_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TMDB_API_KEY_ENV).map_err(|_| {
            Error::configuration_with_context(
                format!("{} is not set", TMDB_API_KEY_ENV),
                ErrorContext::new()
                    .with_field_path(TMDB_API_KEY_ENV)
                    .with_source("movie_service"),
            )
        })?;
        Self::connect(ClientConfig::from_env(), &token)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Most popular movies, one page at a time.
    pub async fn popular_movies(&self, page: u32) -> Vec<Movie> {
        let options = RequestOptions::new()
            .param("include_adult", false)
            .param("include_video", false)
            .param("language", "en-US")
            .param("page", page)
            .param("sort_by", "popularity.desc")
            .cache_ttl(CacheTtl::SHORT);
        let resp = self.client.get::<Paged<Movie>>("/discover/movie", options).await;
        results_or_empty(resp, "popular_movies")
    }

    /// Movies similar to `movie_id`.
    pub async fn similar_movies(&self, movie_id: u64, page: u32) -> Vec<Movie> {
        let options = RequestOptions::new()
            .param("language", "en-US")
            .param("page", page)
            .cache_ttl(CacheTtl::MEDIUM);
        let path = format!("/movie/{}/similar", movie_id);
        let resp = self.client.get::<Paged<Movie>>(&path, options).await;
        results_or_empty(resp, "similar_movies")
    }

    pub async fn search_movies(&self, query: &str, page: u32) -> Vec<Movie> {
        let options = RequestOptions::new()
            .param("query", query)
            .param("page", page)
            .cache_ttl(CacheTtl::SHORT);
        let resp = self.client.get::<Paged<Movie>>("/search/movie", options).await;
        results_or_empty(resp, "search_movies")
    }

    /// Full record for one movie; `None` when it cannot be fetched.
    pub async fn movie_details(&self, movie_id: u64) -> Option<MovieDetail> {
        let path = format!("/movie/{}", movie_id);
        let resp = self
            .client
            .get::<MovieDetail>(&path, RequestOptions::new().cache_ttl(CacheTtl::LONG))
            .await;
        log_failure(&resp, "movie_details");
        resp.into_data()
    }

    pub async fn movie_videos(&self, movie_id: u64) -> Vec<MovieVideo> {
        let path = format!("/movie/{}/videos", movie_id);
        let resp = self
            .client
            .get::<VideoList>(&path, RequestOptions::new().cache_ttl(CacheTtl::LONG))
            .await;
        log_failure(&resp, "movie_videos");
        resp.into_data().map(|list| list.results).unwrap_or_default()
    }

    pub async fn genres(&self) -> Vec<Genre> {
        let resp = self
            .client
            .get::<GenreList>("/genre/movie/list", RequestOptions::new().cache_ttl(CacheTtl::DAY))
            .await;
        log_failure(&resp, "genres");
        resp.into_data().map(|list| list.genres).unwrap_or_default()
    }

    /// Drop every cached response about one movie (details, videos, similar).
    pub fn invalidate_movie(&self, movie_id: u64) -> Result<usize> {
        self.client
            .invalidate_cache(&format!("/movie/{}(/|:)", movie_id))
    }
}

fn results_or_empty<T>(resp: ApiResponse<Paged<T>>, operation: &str) -> Vec<T> {
    log_failure(&resp, operation);
    resp.into_data().map(|page| page.results).unwrap_or_default()
}

fn log_failure<T>(resp: &ApiResponse<T>, operation: &str) {
    if let Some(err) = resp.error() {
        warn!(
            service = "tmdb",
            operation,
            http_status = resp.http_status(),
            retryable = err.retryable,
            "{}",
            err.message
        );
    }
}

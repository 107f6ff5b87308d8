//! YouTube Data v3 trailer lookup.

use crate::cache::CacheTtl;
use crate::client::{ApiClient, ApiResponse, ClientConfig, RequestOptions};
use crate::types::video::{EmbedOptions, SearchResponse, ThumbnailQuality, Video, VideoListResponse};
use crate::{Error, ErrorContext, Result};
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::warn;

pub const YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const YOUTUBE_API_KEY_ENV: &str = "YOUTUBE_API_KEY";
const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const VIDEO_PARTS: &str = "snippet,contentDetails,statistics";

/// Shortest playable trailer accepted by [`VideoService::validate_video`].
pub const MIN_TRAILER_DURATION: Duration = Duration::from_secs(300);
/// Longest.
pub const MAX_TRAILER_DURATION: Duration = Duration::from_secs(14_400);

static ISO8601_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("static duration pattern")
});

const TRAILER_WORDS: [&str; 4] = ["trailer", "official", "movie", "film"];

/// Trailer search and validation backed by YouTube.
///
/// Lookups degrade to empty results on failure and log a warning.
#[derive(Debug)]
pub struct VideoService {
    client: ApiClient,
}

impl VideoService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Build a client from `config` that sends `api_key` with every request.
    ///
    /// An empty `config.base_url` becomes [`YOUTUBE_BASE_URL`], and an unset
    /// cache prefix becomes `youtube`.
    pub fn connect(mut config: ClientConfig, api_key: &str) -> Result<Self> {
        if config.base_url.is_empty() {
            config.base_url = YOUTUBE_BASE_URL.to_string();
        }
        if config.cache_key_prefix.is_none() {
            config.cache_key_prefix = Some("youtube".to_string());
        }
        let client = ApiClient::new(config)?;
        client.set_headers([(API_KEY_HEADER, api_key)])?;
        Ok(Self::new(client))
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(YOUTUBE_API_KEY_ENV).map_err(|_| {
            Error::configuration_with_context(
                format!("{} is not set", YOUTUBE_API_KEY_ENV),
                ErrorContext::new()
                    .with_field_path(YOUTUBE_API_KEY_ENV)
                    .with_source("video_service"),
            )
        })?;
        Self::connect(ClientConfig::from_env(), &api_key)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Embeddable trailers for `query`, with full details.
    pub async fn search_videos(&self, query: &str, max_results: u32) -> Vec<Video> {
        let options = RequestOptions::new()
            .param("part", "snippet")
            .param("q", format!("{} movie trailer", query))
            .param("type", "video")
            .param("maxResults", max_results)
            .param("order", "relevance")
            .param("videoEmbeddable", true)
            .param("videoDuration", "medium")
            .param("videoLicense", "creativeCommon")
            .cache_ttl(CacheTtl::LONG);
        let resp = self.client.get::<SearchResponse>("/search", options).await;
        log_failure(&resp, "search_videos");
        let ids: Vec<String> = match resp.into_data() {
            Some(search) => search
                .items
                .into_iter()
                .filter_map(|item| item.id.video_id)
                .collect(),
            None => return Vec::new(),
        };
        if ids.is_empty() {
            return Vec::new();
        }
        self.videos_by_ids(&ids).await
    }

    pub async fn videos_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<Video> {
        if ids.is_empty() {
            return Vec::new();
        }
        let joined = ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        self.fetch_videos(&joined, "videos_by_ids").await
    }

    pub async fn video_by_id(&self, id: &str) -> Option<Video> {
        self.fetch_videos(id, "video_by_id").await.into_iter().next()
    }

    async fn fetch_videos(&self, ids: &str, operation: &str) -> Vec<Video> {
        let options = RequestOptions::new()
            .param("part", VIDEO_PARTS)
            .param("id", ids)
            .cache_ttl(CacheTtl::LONG);
        let resp = self.client.get::<VideoListResponse>("/videos", options).await;
        log_failure(&resp, operation);
        resp.into_data().map(|list| list.items).unwrap_or_default()
    }

    /// Whether the video exists and runs between 5 minutes and 4 hours.
    pub async fn validate_video(&self, id: &str) -> bool {
        match self.video_by_id(id).await {
            Some(video) => is_playable_length(&video),
            None => false,
        }
    }

    /// Trailer-looking search results that pass [`validate_video`](Self::validate_video),
    /// in search order.
    pub async fn search_trailers(&self, title: &str, max_results: u32) -> Vec<Video> {
        let candidates: Vec<Video> = self
            .search_videos(title, max_results)
            .await
            .into_iter()
            .filter(looks_like_trailer)
            .collect();
        let checks = join_all(candidates.iter().map(|v| self.validate_video(&v.id))).await;
        candidates
            .into_iter()
            .zip(checks)
            .filter_map(|(video, valid)| valid.then_some(video))
            .collect()
    }

    /// Player URL for the YouTube iframe API.
    pub fn embed_url(id: &str, options: EmbedOptions) -> String {
        let flag = |on: bool| if on { "1" } else { "0" };
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("video_id", id)
            .append_pair("enablejsapi", "1")
            .append_pair("autoplay", flag(options.autoplay))
            .append_pair("controls", flag(options.controls))
            .append_pair("showinfo", flag(options.showinfo))
            .append_pair("modestbranding", flag(options.modestbranding))
            .append_pair("rel", flag(options.rel));
        if let Some(start) = options.start.filter(|s| *s > 0) {
            query.append_pair("start", &start.to_string());
        }
        format!("https://www.youtube.com/embed/{}?{}", id, query.finish())
    }

    pub fn thumbnail_url(id: &str, quality: ThumbnailQuality) -> String {
        format!("https://img.youtube.com/vi/{}/{}.jpg", id, quality.file_name())
    }
}

/// Parse an ISO-8601 duration such as `PT1H2M3S`; zero when it does not match.
pub fn parse_iso8601_duration(value: &str) -> Duration {
    let Some(caps) = ISO8601_DURATION.captures(value) else {
        return Duration::ZERO;
    };
    let part = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    Duration::from_secs(
        part(1)
            .saturating_mul(3600)
            .saturating_add(part(2).saturating_mul(60))
            .saturating_add(part(3)),
    )
}

fn is_playable_length(video: &Video) -> bool {
    let length = parse_iso8601_duration(&video.content_details.duration);
    (MIN_TRAILER_DURATION..=MAX_TRAILER_DURATION).contains(&length)
}

fn looks_like_trailer(video: &Video) -> bool {
    let title = video.snippet.title.to_lowercase();
    TRAILER_WORDS.iter().any(|word| title.contains(word))
}

fn log_failure<T>(resp: &ApiResponse<T>, operation: &str) {
    if let Some(err) = resp.error() {
        warn!(
            service = "youtube",
            operation,
            http_status = resp.http_status(),
            retryable = err.retryable,
            "{}",
            err.message
        );
    }
}

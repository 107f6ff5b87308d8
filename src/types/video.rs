//! YouTube Data v3 payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub standard: Option<Thumbnail>,
    pub maxres: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snippet {
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub channel_id: String,
    pub channel_title: String,
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentDetails {
    /// ISO-8601 duration, e.g. `PT2H3M4S`.
    pub duration: String,
    pub dimension: String,
    pub definition: String,
    pub caption: String,
    pub licensed_content: bool,
}

/// Counters arrive as decimal strings; absent ones are hidden by the uploader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub dislike_count: Option<String>,
    pub favorite_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub snippet: Snippet,
    pub content_details: ContentDetails,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageInfo {
    pub total_results: u64,
    pub results_per_page: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchItemId {
    pub kind: String,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: Snippet,
}

/// `/search` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchResponse {
    pub kind: String,
    pub etag: String,
    pub next_page_token: Option<String>,
    pub prev_page_token: Option<String>,
    pub page_info: PageInfo,
    pub items: Vec<SearchItem>,
}

/// `/videos` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoListResponse {
    pub kind: String,
    pub etag: String,
    pub page_info: PageInfo,
    pub items: Vec<Video>,
}

/// Player parameters for [`VideoService::embed_url`](crate::services::VideoService::embed_url).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedOptions {
    pub autoplay: bool,
    pub controls: bool,
    pub showinfo: bool,
    pub modestbranding: bool,
    pub rel: bool,
    /// Start offset in seconds.
    pub start: Option<u32>,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            autoplay: false,
            controls: true,
            showinfo: true,
            modestbranding: true,
            rel: true,
            start: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailQuality {
    Default,
    Medium,
    #[default]
    High,
    Standard,
    Maxres,
}

impl ThumbnailQuality {
    /// Image file name on `img.youtube.com`.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Medium => "mqdefault",
            Self::High => "hqdefault",
            Self::Standard => "sddefault",
            Self::Maxres => "maxresdefault",
        }
    }
}

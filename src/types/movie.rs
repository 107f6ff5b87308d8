//! TMDB v3 payloads.

use serde::{Deserialize, Deserializer, Serialize};

/// Base URL for TMDB poster and backdrop images.
pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Treats an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A movie as it appears in list endpoints (discover, search, similar).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: u64,
    pub genre_ids: Vec<u64>,
    pub popularity: f64,
    pub adult: bool,
    pub video: bool,
}

impl Movie {
    /// Poster URL at a TMDB image size such as `"w500"` or `"original"`.
    pub fn poster_url(&self, size: &str) -> Option<String> {
        image_url(self.poster_path.as_deref()?, size)
    }

    pub fn backdrop_url(&self, size: &str) -> Option<String> {
        image_url(self.backdrop_path.as_deref()?, size)
    }
}

fn image_url(path: &str, size: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    Some(format!("{}/{}{}", TMDB_IMAGE_BASE_URL, size, path))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionCompany {
    pub id: u64,
    pub logo_path: Option<String>,
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub origin_country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpokenLanguage {
    pub english_name: String,
    pub iso_639_1: String,
    pub name: String,
}

/// Full record from `/movie/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieDetail {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub overview: String,
    pub tagline: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub runtime: Option<u32>,
    pub budget: u64,
    pub revenue: u64,
    pub vote_average: f64,
    pub vote_count: u64,
    pub popularity: f64,
    pub adult: bool,
    pub video: bool,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub belongs_to_collection: Option<serde_json::Value>,
    pub genres: Vec<Genre>,
    pub production_companies: Vec<ProductionCompany>,
    pub production_countries: Vec<ProductionCountry>,
    pub spoken_languages: Vec<SpokenLanguage>,
}

/// A trailer/clip entry from `/movie/{id}/videos`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieVideo {
    pub id: String,
    pub iso_639_1: String,
    pub iso_3166_1: String,
    pub name: String,
    /// Key on the hosting site (for YouTube, the video id).
    pub key: String,
    pub site: String,
    pub size: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub official: bool,
    pub published_at: String,
}

impl MovieVideo {
    pub fn is_youtube_trailer(&self) -> bool {
        self.site.eq_ignore_ascii_case("youtube") && self.kind.eq_ignore_ascii_case("trailer")
    }
}

/// Paginated list envelope used by TMDB list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paged<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u64,
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            page: 0,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GenreList {
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct VideoList {
    pub id: u64,
    pub results: Vec<MovieVideo>,
}

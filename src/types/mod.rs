//! 领域类型：电影元数据与视频元数据的响应结构。
//!
//! # Types Module
//!
//! Strongly-typed payloads for the two upstream APIs the services talk to.
//! Every struct tolerates missing fields (and `null` where the upstream is
//! known to send it), so a partial record still decodes.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`movie`] | TMDB v3 movies, details, genres, videos |
//! | [`video`] | YouTube Data v3 videos and search results |

pub mod movie;
pub mod video;

pub use movie::{
    Genre, Movie, MovieDetail, MovieVideo, Paged, ProductionCompany, ProductionCountry,
    SpokenLanguage,
};
pub use video::{
    ContentDetails, EmbedOptions, SearchResponse, Snippet, Statistics, Thumbnail,
    ThumbnailQuality, Thumbnails, Video, VideoListResponse,
};

use async_trait::async_trait;
use thiserror::Error;

mod client;

pub use client::{
    AiringEpisode, AniListClient, CoverImage, FuzzyDate, MediaTitle, RawMedia, DEFAULT_ENDPOINT,
};

/// Why a title produced no media. All three are dropped from the board the same way;
/// the distinction only matters for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("no AniList media found for \"{title}\"")]
    NotFound { title: String },
    #[error("rate limit hit for \"{title}\", wait and try again")]
    RateLimited { title: String },
    #[error("AniList request for \"{title}\" failed: {message}")]
    Network { title: String, message: String },
}

impl FetchError {
    pub fn title(&self) -> &str {
        match self {
            FetchError::NotFound { title }
            | FetchError::RateLimited { title }
            | FetchError::Network { title, .. } => title,
        }
    }
}

#[async_trait]
pub trait AniListApi: Send + Sync {
    /// One fuzzy search request per call, no retries.
    async fn fetch_media(&self, title: &str) -> Result<RawMedia, FetchError>;
}

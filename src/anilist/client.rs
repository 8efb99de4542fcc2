use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::{AniListApi, FetchError};

pub const DEFAULT_ENDPOINT: &str = "https://graphql.anilist.co";

// Field list matches what the schedule builder reads.
const MEDIA_QUERY: &str = r#"
query ($search: String) {
  Media(search: $search, type: ANIME) {
    title { english romaji native }
    coverImage { large }
    season
    seasonYear
    startDate { year month day }
    episodes
    status
    siteUrl
    nextAiringEpisode { airingAt episode timeUntilAiring }
  }
}
"#;

#[derive(Debug, Clone)]
pub struct AniListClient {
    client: Client,
    endpoint: String,
}

impl AniListClient {
    /// `timeout` of `None` leaves requests unbounded; a stalled request stalls the board.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let user_agent = format!("anischedule/{}", env!("CARGO_PKG_VERSION"));
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .context("Failed to build AniList HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AniListApi for AniListClient {
    async fn fetch_media(&self, title: &str) -> Result<RawMedia, FetchError> {
        #[derive(Deserialize)]
        struct GraphQlResponse<T> {
            data: Option<T>,
            errors: Option<Vec<GraphQlError>>,
        }

        #[derive(Deserialize)]
        struct GraphQlError {
            message: String,
            status: Option<i32>,
        }

        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "Media")]
            media: Option<RawMedia>,
        }

        let body = json!({
            "query": MEDIA_QUERY,
            "variables": { "search": title }
        });

        debug!(endpoint = %self.endpoint, "Fetching AniList media for \"{}\"", title);
        let network = |e: reqwest::Error| {
            error!("Error fetching from AniList API for \"{}\": {}", title, e);
            FetchError::Network {
                title: title.to_string(),
                message: e.to_string(),
            }
        };

        let res = self
            .client
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(network)?;

        let status = res.status();
        let bytes = res.bytes().await.map_err(network)?;
        if !status.is_success() {
            error!(
                "AniList API error for \"{}\" (status {}): {}",
                title,
                status,
                String::from_utf8_lossy(&bytes)
            );
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!("Rate limit hit for \"{}\"", title);
                return Err(FetchError::RateLimited {
                    title: title.to_string(),
                });
            }
            return Err(FetchError::NotFound {
                title: title.to_string(),
            });
        }

        let parsed: GraphQlResponse<Data> = serde_json::from_slice(&bytes).map_err(|e| {
            error!("Failed to parse AniList JSON for \"{}\": {}", title, e);
            FetchError::Network {
                title: title.to_string(),
                message: format!("invalid response body: {}", e),
            }
        })?;
        if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
            let msg = errors
                .into_iter()
                .map(|e| match e.status {
                    Some(s) => format!("{} (status {})", e.message, s),
                    None => e.message,
                })
                .collect::<Vec<_>>()
                .join("; ");
            warn!("AniList GraphQL error for \"{}\": {}", title, msg);
        }

        parsed
            .data
            .and_then(|d| d.media)
            .ok_or_else(|| FetchError::NotFound {
                title: title.to_string(),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMedia {
    pub title: Option<MediaTitle>,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<CoverImage>,
    pub season: Option<String>,
    #[serde(rename = "seasonYear")]
    pub season_year: Option<i32>,
    #[serde(rename = "startDate")]
    pub start_date: Option<FuzzyDate>,
    pub episodes: Option<i32>,
    pub status: Option<String>,
    #[serde(rename = "siteUrl")]
    pub site_url: Option<String>,
    #[serde(rename = "nextAiringEpisode")]
    pub next_airing_episode: Option<AiringEpisode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTitle {
    pub english: Option<String>,
    pub romaji: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub large: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiringEpisode {
    /// Unix seconds.
    #[serde(rename = "airingAt")]
    pub airing_at: i64,
    pub episode: i32,
    #[serde(rename = "timeUntilAiring")]
    pub time_until_airing: i64,
}

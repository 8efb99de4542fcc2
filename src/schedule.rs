use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::fmt;

use crate::anilist::{AiringEpisode, MediaTitle, RawMedia};
use crate::format::{format_season, format_time_until_airing};

pub const PLACEHOLDER_COVER: &str =
    "https://placehold.co/400x600/1a202c/e2e8f0?text=Image+Not+Available";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NOT_AVAILABLE: &str = "N/A";

const IST_OFFSET_SECS: i32 = 5 * 3_600 + 30 * 60;
// en-IN short weekday/month, 2-digit 12h clock: "Wed, 15 Nov, 03:43 am"
const IST_FORMAT: &str = "%a, %-d %b, %I:%M %P";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EpisodeNumber {
    Known(i32),
    NotAvailable,
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeNumber::Known(n) => write!(f, "{}", n),
            EpisodeNumber::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Display-ready view of one media entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRecord {
    pub display_name: String,
    pub cover_image: String,
    pub season_and_year: String,
    pub next_episode_info: String,
    pub next_episode_number: EpisodeNumber,
    pub time_until_next_episode: String,
    /// Never set to true by `build_schedule`.
    pub is_coming_soon: bool,
    pub site_url: Option<String>,
}

pub fn build_schedule(media: &RawMedia) -> ScheduleRecord {
    let display_name = choose_display_name(media.title.as_ref());

    let cover_image = media
        .cover_image
        .as_ref()
        .and_then(|c| c.large.as_deref())
        .filter(|s| !s.is_empty())
        .unwrap_or(PLACEHOLDER_COVER)
        .to_string();

    let year = media
        .season_year
        .map(|y| y.to_string())
        .unwrap_or_default();
    let season_and_year = format!("{} {}", format_season(media.season.as_deref()), year)
        .trim()
        .to_string();

    // Part of the record shape only; no input turns it on.
    let is_coming_soon = false;

    let mut next_episode_number = EpisodeNumber::NotAvailable;
    let mut time_until_next_episode = NOT_AVAILABLE.to_string();
    let status = media.status.as_deref();

    let next_episode_info = if let Some(next) = &media.next_airing_episode {
        time_until_next_episode = format_time_until_airing(next.time_until_airing);
        next_episode_number = EpisodeNumber::Known(next.episode);
        describe_next_episode(next, &time_until_next_episode)
    } else if status == Some("FINISHED") {
        "Series has concluded.".to_string()
    } else if status == Some("NOT_YET_RELEASED") || is_coming_soon {
        "Not yet aired.".to_string()
    } else if media.episodes.is_some_and(|e| e > 0) {
        "Series has likely concluded.".to_string()
    } else {
        "Series information not available.".to_string()
    };

    ScheduleRecord {
        display_name,
        cover_image,
        season_and_year,
        next_episode_info,
        next_episode_number,
        time_until_next_episode,
        is_coming_soon,
        site_url: media.site_url.clone(),
    }
}

fn choose_display_name(title: Option<&MediaTitle>) -> String {
    let Some(title) = title else {
        return UNKNOWN_TITLE.to_string();
    };
    [&title.english, &title.romaji, &title.native]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .find(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_TITLE)
        .to_string()
}

fn describe_next_episode(next: &AiringEpisode, countdown: &str) -> String {
    format!(
        "Ep {} on {} IST ({})",
        next.episode,
        format_airing_time_ist(next.airing_at),
        countdown
    )
}

/// Formats unix seconds in India Standard Time. Out-of-range values render as
/// "Invalid Date".
pub fn format_airing_time_ist(airing_at: i64) -> String {
    let ist = FixedOffset::east_opt(IST_OFFSET_SECS);
    let utc = airing_at
        .checked_mul(1000)
        .and_then(DateTime::<Utc>::from_timestamp_millis);
    match (ist, utc) {
        (Some(ist), Some(utc)) => utc.with_timezone(&ist).format(IST_FORMAT).to_string(),
        _ => "Invalid Date".to_string(),
    }
}

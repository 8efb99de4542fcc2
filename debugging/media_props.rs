use anischedule::anilist::{AniListApi, AniListClient};
use anischedule::config::Config;
use anischedule::schedule::build_schedule;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    init_tracing();

    let config = Config::from_env()?;
    let title = match env::args().nth(1) {
        Some(t) => t,
        None => config
            .titles
            .first()
            .cloned()
            .context("No title given and none configured")?,
    };
    info!("AniList fetch: \"{}\" via {}", title, config.endpoint);

    let client = AniListClient::new(&config.endpoint, config.request_timeout)?;
    let media = client.fetch_media(&title).await?;

    info!("--- AniList raw fields ---");
    let t = media.title.clone().unwrap_or_default();
    info!("title.english: {}", t.english.as_deref().unwrap_or("<none>"));
    info!("title.romaji: {}", t.romaji.as_deref().unwrap_or("<none>"));
    info!("title.native: {}", t.native.as_deref().unwrap_or("<none>"));
    info!("season: {:?} {:?}", media.season, media.season_year);
    info!("start_date: {:?}", media.start_date);
    info!("episodes: {:?}", media.episodes);
    info!("status: {}", media.status.as_deref().unwrap_or("<none>"));
    info!("site_url: {}", media.site_url.as_deref().unwrap_or("<none>"));
    match &media.next_airing_episode {
        Some(next) => info!(
            "next_airing_episode: ep {} at {} ({}s from now)",
            next.episode, next.airing_at, next.time_until_airing
        ),
        None => info!("next_airing_episode: <none>"),
    }

    let record = build_schedule(&media);
    let pretty =
        serde_json::to_string_pretty(&record).context("Failed to serialize schedule record")?;
    info!("--- Schedule record ---\n{}", pretty);
    Ok(())
}

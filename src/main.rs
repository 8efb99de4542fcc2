use anischedule::anilist::AniListClient;
use anischedule::app::ScheduleBoard;
use anischedule::config::Config;
use anischedule::pacing::SleepPacer;
use anischedule::render::SchedulePage;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before tracing so RUST_LOG from .env takes effect.
    let dotenv_result = dotenv();
    init_tracing();
    match dotenv_result {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }

    let config = Config::from_env()?;
    let client = AniListClient::new(&config.endpoint, config.request_timeout)?;
    info!("Using AniList endpoint {}", client.endpoint());

    let mut board = ScheduleBoard::new(&config, Arc::new(client), Arc::new(SleepPacer));
    let mut page = SchedulePage::new();
    let outcome = board.run(&mut page).await;
    if outcome.had_error() {
        warn!(
            "Some anime details could not be loaded: {}",
            outcome
                .failures
                .iter()
                .map(|f| f.title())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let document = page.render_document();
    match &config.output {
        Some(path) => {
            tokio::fs::write(path, document)
                .await
                .with_context(|| format!("Failed to write schedule page to {}", path.display()))?;
            info!("Wrote schedule page to {}", path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(document.as_bytes())
                .await
                .context("Failed to write schedule page to stdout")?;
            stdout.flush().await.context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::anilist::{AniListApi, FetchError};
use crate::config::Config;
use crate::pacing::Pacer;
use crate::render::{render_cards, SchedulePage};
use crate::schedule::{build_schedule, ScheduleRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Fetching { index: usize },
    Delaying { index: usize },
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Input order, failed titles skipped.
    pub records: Vec<ScheduleRecord>,
    pub failures: Vec<FetchError>,
}

impl RunOutcome {
    pub fn had_error(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Fetches every configured title one after another and lays the results out on a
/// [`SchedulePage`].
pub struct ScheduleBoard {
    api: Arc<dyn AniListApi>,
    pacer: Arc<dyn Pacer>,
    titles: Vec<String>,
    delay: Duration,
    phase: Phase,
}

impl ScheduleBoard {
    pub fn new(config: &Config, api: Arc<dyn AniListApi>, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            api,
            pacer,
            titles: config.titles.clone(),
            delay: config.delay,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub async fn run(&mut self, page: &mut SchedulePage) -> RunOutcome {
        self.set_phase(Phase::Loading);
        page.show_loading();

        let outcome = self.collect().await;

        if outcome.had_error() {
            page.show_error();
        }
        page.show_results(render_cards(&outcome.records));
        self.set_phase(Phase::Done);

        info!(
            "Schedule ready: {} of {} titles rendered, {} failed",
            outcome.records.len(),
            self.titles.len(),
            outcome.failures.len()
        );
        outcome
    }

    /// One request per title, strictly sequential, with a pause between
    /// consecutive titles. A failed title never stops the loop.
    pub async fn collect(&mut self) -> RunOutcome {
        info!(
            "Fetching {} titles with {}ms between requests",
            self.titles.len(),
            self.delay.as_millis()
        );
        let mut outcome = RunOutcome::default();
        let titles = self.titles.clone();

        for (index, title) in titles.iter().enumerate() {
            self.set_phase(Phase::Fetching { index });
            match self.api.fetch_media(title).await {
                Ok(media) => {
                    let record = build_schedule(&media);
                    info!(
                        "Scheduled \"{}\" as '{}': {}",
                        title, record.display_name, record.next_episode_info
                    );
                    outcome.records.push(record);
                }
                Err(err @ FetchError::NotFound { .. }) => {
                    error!("Could not find details for \"{}\".", title);
                    outcome.failures.push(err);
                }
                Err(err) => {
                    error!("Failed to fetch details for \"{}\": {}", title, err);
                    outcome.failures.push(err);
                }
            }

            if index + 1 < titles.len() {
                self.set_phase(Phase::Delaying { index });
                self.pacer.pause(self.delay).await;
            }
        }

        outcome
    }

    fn set_phase(&mut self, phase: Phase) {
        debug!(?phase, "Board phase change");
        self.phase = phase;
    }
}

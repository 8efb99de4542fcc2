use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::anilist::DEFAULT_ENDPOINT;

pub const DEFAULT_TITLES: [&str; 5] = [
    "City the Animation",
    "Bad Girl",
    "My Dress-Up Darling Season 2",
    "Dandadan Season 2",
    "Rent-a-Girlfriend Season 4",
];
pub const DEFAULT_DELAY_MS: u64 = 1000;

const ENDPOINT_VAR: &str = "ANISCHEDULE_ENDPOINT";
const TITLES_VAR: &str = "ANISCHEDULE_TITLES";
const DELAY_VAR: &str = "ANISCHEDULE_DELAY_MS";
const TIMEOUT_VAR: &str = "ANISCHEDULE_TIMEOUT_SECS";
const OUTPUT_VAR: &str = "ANISCHEDULE_OUTPUT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: String,
    /// Queried in order; duplicates are fetched twice.
    pub titles: Vec<String>,
    pub delay: Duration,
    pub request_timeout: Option<Duration>,
    /// `None` writes the page to stdout.
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            titles: DEFAULT_TITLES.iter().map(|t| t.to_string()).collect(),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            request_timeout: None,
            output: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
        let mut config = Self::default();

        if let Some(endpoint) = var(ENDPOINT_VAR) {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(raw) = var(TITLES_VAR) {
            let titles = parse_titles(&raw);
            if titles.is_empty() {
                anyhow::bail!("{} contains no titles", TITLES_VAR);
            }
            config.titles = titles;
        }
        if let Some(raw) = var(DELAY_VAR) {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of milliseconds", DELAY_VAR))?;
            config.delay = Duration::from_millis(ms);
        }
        if let Some(raw) = var(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_VAR))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        config.output = var(OUTPUT_VAR).map(|p| PathBuf::from(p.trim()));

        Ok(config)
    }
}

/// Splits a `|`-separated list, dropping blank entries.
pub fn parse_titles(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

//! Configuration loading and resolution.
//!
//! Each field resolves from an explicit override (command line), then a
//! `SKIMMER_*` environment variable, then the built-in default.

use crate::error::{ScrapeError, ScrapeResult};
use crate::listing::ListingSelectors;
use crate::rank::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Listing page collected by default.
pub const DEFAULT_URL: &str = "https://news.ycombinator.com/newest";

/// Settings for one collection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Listing page to open.
    pub url: String,
    pub selectors: ListingSelectors,
    /// Stop collecting once at least this many entries are held.
    pub target: usize,
    pub navigation_timeout_ms: u64,
    pub selector_timeout_ms: u64,
    /// Pause after each scroll for lazily-loaded content.
    pub settle_delay_ms: u64,
    /// Hard ceiling on extraction rounds.
    pub max_rounds: u32,
    /// Give up after this many consecutive rounds that appended nothing.
    pub max_stagnant_rounds: u32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            selectors: ListingSelectors::default(),
            target: 100,
            navigation_timeout_ms: 60_000,
            selector_timeout_ms: 20_000,
            settle_delay_ms: 3_000,
            max_rounds: 20,
            max_stagnant_rounds: 3,
        }
    }
}

/// Settings for a full scrape: collection plus ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub collector: CollectorConfig,
    /// Number of ranked entries to keep.
    pub limit: usize,
    /// Explicit Chromium binary; discovered when `None`.
    pub chromium_path: Option<PathBuf>,
    /// Where to save the collected page's HTML, for later `rank` runs.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            collector: CollectorConfig::default(),
            limit: DEFAULT_LIMIT,
            chromium_path: None,
            snapshot_path: None,
        }
    }
}

/// Values supplied on the command line. `None` falls through to the
/// environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub target: Option<usize>,
    pub limit: Option<usize>,
    pub max_rounds: Option<u32>,
    pub settle_delay_ms: Option<u64>,
    pub navigation_timeout_ms: Option<u64>,
    pub selector_timeout_ms: Option<u64>,
    pub chromium_path: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
}

impl ScrapeConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> ScrapeResult<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with<F>(overrides: ConfigOverrides, env: F) -> ScrapeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CollectorConfig::default();

        let collector = CollectorConfig {
            url: overrides
                .url
                .or_else(|| env("SKIMMER_URL"))
                .unwrap_or(defaults.url),
            target: pick(overrides.target, &env, "SKIMMER_TARGET", defaults.target),
            navigation_timeout_ms: pick(
                overrides.navigation_timeout_ms,
                &env,
                "SKIMMER_NAV_TIMEOUT_MS",
                defaults.navigation_timeout_ms,
            ),
            selector_timeout_ms: pick(
                overrides.selector_timeout_ms,
                &env,
                "SKIMMER_SELECTOR_TIMEOUT_MS",
                defaults.selector_timeout_ms,
            ),
            settle_delay_ms: pick(
                overrides.settle_delay_ms,
                &env,
                "SKIMMER_SETTLE_MS",
                defaults.settle_delay_ms,
            ),
            max_rounds: pick(
                overrides.max_rounds,
                &env,
                "SKIMMER_MAX_ROUNDS",
                defaults.max_rounds,
            ),
            ..defaults
        };

        let config = Self {
            collector,
            limit: pick(overrides.limit, &env, "SKIMMER_LIMIT", DEFAULT_LIMIT),
            chromium_path: overrides
                .chromium_path
                .or_else(|| env("SKIMMER_CHROMIUM_PATH").map(PathBuf::from)),
            snapshot_path: overrides
                .snapshot_path
                .or_else(|| env("SKIMMER_SAVE_HTML").map(PathBuf::from)),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make a run meaningless.
    pub fn validate(&self) -> ScrapeResult<()> {
        if self.collector.target == 0 {
            return Err(ScrapeError::Config("target must be at least 1".into()));
        }
        if self.limit == 0 {
            return Err(ScrapeError::Config("limit must be at least 1".into()));
        }
        if self.collector.max_rounds == 0 {
            return Err(ScrapeError::Config("max_rounds must be at least 1".into()));
        }
        if self.collector.selectors.container.trim().is_empty() {
            return Err(ScrapeError::Config("container selector is empty".into()));
        }
        Ok(())
    }
}

fn pick<T, F>(explicit: Option<T>, env: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = explicit {
        return value;
    }
    match env(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("ignoring unparseable {key}={raw:?}");
                default
            }
        },
        None => default,
    }
}

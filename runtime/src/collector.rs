//! Round-based accumulation of listing entries from a live page.
//!
//! One run is: navigate, wait for the listing container, then repeat
//! extract → append → scroll → settle until the target is met. The last round
//! may overshoot the target; trimming happens at ranking time.
//!
//! Two guards bound the loop: a hard round ceiling and a stagnation limit on
//! consecutive rounds that appended nothing. Tripping either is not an error.
//! The run ends and reports why.

use crate::config::CollectorConfig;
use crate::error::ScrapeResult;
use crate::listing::selectors::parse_extracted;
use crate::listing::EntryCollection;
use crate::progress::{self, ProgressEventKind, ProgressSender};
use crate::renderer::RenderContext;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Why collection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The collection reached the target size.
    TargetReached,
    /// The round ceiling was hit first.
    MaxRounds,
    /// Too many consecutive rounds appended nothing.
    Stagnated,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TargetReached => write!(f, "target reached"),
            Self::MaxRounds => write!(f, "round limit reached"),
            Self::Stagnated => write!(f, "page stopped yielding entries"),
        }
    }
}

/// Outcome of a collection run.
#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub entries: EntryCollection,
    pub rounds: u32,
    pub stop: StopReason,
}

/// Drives a [`RenderContext`] through the collection rounds.
pub struct Collector<'a> {
    config: &'a CollectorConfig,
    progress: Option<ProgressSender>,
}

impl<'a> Collector<'a> {
    pub fn new(config: &'a CollectorConfig, progress: Option<ProgressSender>) -> Self {
        Self { config, progress }
    }

    /// Open the listing page and accumulate entries.
    ///
    /// Navigation and selector-wait timeouts are fatal. Every other failure
    /// of the page (script errors, malformed extraction results) is as well.
    pub async fn collect(&self, ctx: &mut dyn RenderContext) -> ScrapeResult<CollectionReport> {
        let cfg = self.config;
        let mut seq = 0u64;

        self.emit(
            &mut seq,
            ProgressEventKind::NavigationStarted {
                url: cfg.url.clone(),
            },
        );
        let nav = ctx.navigate(&cfg.url, cfg.navigation_timeout_ms).await?;
        debug!("navigated to {} in {}ms", nav.final_url, nav.load_time_ms);

        ctx.wait_for_selector(&cfg.selectors.container, cfg.selector_timeout_ms)
            .await?;
        self.emit(
            &mut seq,
            ProgressEventKind::PageReady {
                final_url: nav.final_url,
                load_time_ms: nav.load_time_ms,
            },
        );

        let script = cfg.selectors.extraction_script();
        let mut entries = EntryCollection::new();
        let mut round = 0u32;
        let mut stagnant = 0u32;

        let stop = loop {
            round += 1;
            self.emit(&mut seq, ProgressEventKind::RoundStarted { round });

            let batch = parse_extracted(ctx.execute_js(&script).await?)?;
            let appended = entries.extend(batch);
            debug!(
                "round {round}: {appended} extracted, {} total",
                entries.len()
            );
            self.emit(
                &mut seq,
                ProgressEventKind::RoundCompleted {
                    round,
                    appended,
                    total: entries.len(),
                },
            );

            if entries.len() >= cfg.target {
                break StopReason::TargetReached;
            }

            if appended == 0 {
                stagnant += 1;
                if stagnant >= cfg.max_stagnant_rounds {
                    break StopReason::Stagnated;
                }
            } else {
                stagnant = 0;
            }

            if round >= cfg.max_rounds {
                break StopReason::MaxRounds;
            }

            ctx.scroll_by_viewport().await?;
            tokio::time::sleep(Duration::from_millis(cfg.settle_delay_ms)).await;
            self.emit(
                &mut seq,
                ProgressEventKind::Scrolled {
                    round,
                    settle_ms: cfg.settle_delay_ms,
                },
            );
        };

        if stop == StopReason::TargetReached {
            info!("collected {} entries in {round} round(s)", entries.len());
        } else {
            let message = format!(
                "collection stopped early ({stop}) with {} of {} entries after {round} round(s)",
                entries.len(),
                cfg.target
            );
            warn!("{message}");
            self.emit(&mut seq, ProgressEventKind::Warning { message });
        }

        self.emit(
            &mut seq,
            ProgressEventKind::CollectionStopped {
                reason: stop,
                rounds: round,
                total: entries.len(),
            },
        );

        Ok(CollectionReport {
            entries,
            rounds: round,
            stop,
        })
    }

    fn emit(&self, seq: &mut u64, event: ProgressEventKind) {
        progress::emit(&self.progress, seq, event);
    }
}

//! End-to-end run: collect, normalize, rank.
//!
//! The browser context and the browser itself are released on every exit
//! path. When both collection and release fail, the collection error wins.

use crate::collector::{CollectionReport, Collector, StopReason};
use crate::config::ScrapeConfig;
use crate::error::ScrapeResult;
use crate::listing::{Entry, EntryCollection};
use crate::progress::ProgressSender;
use crate::rank::rank;
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::{RenderContext, Renderer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// The ranked result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedListing {
    /// The reference instant every relative age was resolved against.
    pub captured_at: DateTime<Utc>,
    /// Entries held before truncation.
    pub collected: usize,
    pub rounds: u32,
    /// Why collection ended. `None` when ranking a saved page.
    pub stop: Option<StopReason>,
    /// Newest first, at most `limit` long.
    pub entries: Vec<Entry>,
}

impl RankedListing {
    /// Resolve and rank a finished collection against `now`.
    pub fn from_report(report: CollectionReport, limit: usize, now: DateTime<Utc>) -> Self {
        let collected = report.entries.len();
        Self {
            captured_at: now,
            collected,
            rounds: report.rounds,
            stop: Some(report.stop),
            entries: rank(report.entries.resolve(now), limit),
        }
    }

    /// Rank entries that did not come from a live collection (a saved page).
    pub fn from_entries(entries: EntryCollection, limit: usize, now: DateTime<Utc>) -> Self {
        Self {
            captured_at: now,
            collected: entries.len(),
            rounds: 0,
            stop: None,
            entries: rank(entries.resolve(now), limit),
        }
    }
}

/// Collect from a fresh context of `renderer` and rank the result.
///
/// The context is closed whether or not collection succeeded. With
/// `snapshot_path` set, the page HTML is saved after a successful collection.
pub async fn scrape(
    renderer: &dyn Renderer,
    config: &ScrapeConfig,
    progress: Option<ProgressSender>,
) -> ScrapeResult<RankedListing> {
    let mut ctx = renderer.new_context().await?;

    let mut collected = Collector::new(&config.collector, progress)
        .collect(ctx.as_mut())
        .await;
    if collected.is_ok() {
        if let Err(e) = save_snapshot(ctx.as_ref(), config.snapshot_path.as_deref()).await {
            collected = Err(e);
        }
    }

    if let Err(e) = ctx.close().await {
        warn!("failed to close page: {e}");
    }

    let report = collected?;
    info!(
        "ranking {} entries (stop: {})",
        report.entries.len(),
        report.stop
    );
    Ok(RankedListing::from_report(report, config.limit, Utc::now()))
}

/// Run [`scrape`] on `renderer`, then shut the renderer down whatever the
/// outcome.
pub async fn run_with(
    renderer: &dyn Renderer,
    config: &ScrapeConfig,
    progress: Option<ProgressSender>,
) -> ScrapeResult<RankedListing> {
    let result = scrape(renderer, config, progress).await;

    if let Err(e) = renderer.shutdown().await {
        warn!("browser shutdown failed: {e}");
    }
    result
}

/// Launch Chromium and hand it to [`run_with`].
pub async fn run_chromium(
    config: &ScrapeConfig,
    progress: Option<ProgressSender>,
) -> ScrapeResult<RankedListing> {
    let renderer = ChromiumRenderer::new(config.chromium_path.as_deref()).await?;
    run_with(&renderer, config, progress).await
}

async fn save_snapshot(ctx: &dyn RenderContext, path: Option<&Path>) -> ScrapeResult<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let html = ctx.get_html().await?;
    tokio::fs::write(path, html).await?;
    info!("saved page snapshot to {}", path.display());
    Ok(())
}

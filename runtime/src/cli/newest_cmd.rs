//! `skimmer newest`: collect the live listing and print it newest first.

use crate::cli::output;
use crate::config::{ConfigOverrides, ScrapeConfig};
use crate::progress::{self, ProgressEventKind, ProgressReceiver};
use crate::scrape;
use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;

/// Run the newest command.
pub async fn run(overrides: ConfigOverrides) -> Result<()> {
    let config = ScrapeConfig::resolve(overrides).context("invalid configuration")?;

    let (tx, rx) = progress::channel();
    let renderer = tokio::spawn(render_progress(rx));

    output::status("Launching Chromium...");
    let result = scrape::run_chromium(&config, Some(tx)).await;

    // All senders are gone once the run returns; drain what is left
    let _ = renderer.await;

    let url = &config.collector.url;
    let listing = result.with_context(|| format!("failed to collect {url}"))?;
    output::print_listing(&listing);
    output::status("Browser closed.");
    Ok(())
}

/// Turn progress events into console status lines.
async fn render_progress(mut rx: ProgressReceiver) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Some(line) = status_line(&event.event) {
                    output::status(&line);
                }
            }
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
}

fn status_line(event: &ProgressEventKind) -> Option<String> {
    match event {
        ProgressEventKind::NavigationStarted { url } => Some(format!("Opening {url}...")),
        ProgressEventKind::PageReady { .. } => {
            Some("Page loaded, extracting articles...".to_string())
        }
        ProgressEventKind::RoundStarted { round } => Some(format!("Loading page {round}...")),
        ProgressEventKind::CollectionStopped { total, .. } => {
            Some(format!("Articles extracted: {total}"))
        }
        ProgressEventKind::Warning { message } => Some(format!("Warning: {message}")),
        ProgressEventKind::RoundCompleted { .. } | ProgressEventKind::Scrolled { .. } => None,
    }
}

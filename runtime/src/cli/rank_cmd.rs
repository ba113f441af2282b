//! `skimmer rank <file>`: rank a saved listing page without a browser.

use crate::cli::output;
use crate::listing::html::extract_from_html;
use crate::listing::{EntryCollection, ListingSelectors};
use crate::scrape::RankedListing;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;

/// Run the rank command.
pub async fn run(path: &Path, limit: usize) -> Result<()> {
    let listing = rank_file(path, limit)?;
    output::status(&format!("Articles extracted: {}", listing.collected));
    output::print_listing(&listing);
    Ok(())
}

/// Extract, resolve and rank the entries of an HTML snapshot.
pub fn rank_file(path: &Path, limit: usize) -> Result<RankedListing> {
    anyhow::ensure!(limit > 0, "limit must be at least 1");

    let html = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let entries = extract_from_html(&html, &ListingSelectors::default())
        .with_context(|| format!("failed to extract entries from {}", path.display()))?;

    Ok(RankedListing::from_entries(
        EntryCollection::from(entries),
        limit,
        Utc::now(),
    ))
}

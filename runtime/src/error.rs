// Copyright 2026 Skimmer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the collection pipeline.

/// All errors that can end a scrape run.
///
/// Extraction and parse anomalies never show up here: they degrade to
/// sentinel values instead.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("Chromium not found. Set SKIMMER_CHROMIUM_PATH or install Chrome/Chromium")]
    ChromiumNotFound,

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error(
        "selector '{selector}' did not appear within {timeout_ms}ms{}",
        last_error_suffix(.last_error)
    )]
    SelectorTimeout {
        selector: String,
        timeout_ms: u64,
        /// The most recent check failure, if the page ever refused one.
        last_error: Option<String>,
    },

    #[error("script execution failed: {0}")]
    Script(String),

    #[error("unexpected extraction result: {0}")]
    Extraction(String),

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!(" (last error: {e})"),
        None => String::new(),
    }
}

/// Convenience result type.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

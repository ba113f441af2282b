// Copyright 2026 Skimmer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Skimmer runtime library. Collects a newest-submissions listing with
//! headless Chromium and ranks it by submission time.
//!
//! This library crate exposes the core modules for integration testing.

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod listing;
pub mod normalize;
pub mod progress;
pub mod rank;
pub mod renderer;
pub mod scrape;

pub use error::{ScrapeError, ScrapeResult};

//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `Renderer` and `RenderContext` traits that abstract over
//! the browser engine (currently Chromium via chromiumoxide). The collector
//! only talks to these traits, so tests can swap in a scripted page.

pub mod chromium;

use crate::error::{ScrapeError, ScrapeResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// How often `wait_for_selector` checks the DOM.
pub const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of navigating to a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> ScrapeResult<Box<dyn RenderContext>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> ScrapeResult<()>;
    /// Number of currently active contexts.
    fn active_contexts(&self) -> usize;
}

/// A single browser context (tab) for rendering pages.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL with a timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> ScrapeResult<NavigationResult>;
    /// Execute JavaScript in the page context and return the result.
    async fn execute_js(&self, script: &str) -> ScrapeResult<serde_json::Value>;
    /// Get the full page HTML.
    async fn get_html(&self) -> ScrapeResult<String>;
    /// Close this context.
    async fn close(self: Box<Self>) -> ScrapeResult<()>;

    /// Wait until `selector` matches at least one element, polling every
    /// [`SELECTOR_POLL_INTERVAL`].
    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> ScrapeResult<()> {
        let check = format!("document.querySelector({}) !== null", js_string(selector));
        // A page still loading can reject evaluation; keep polling until the deadline
        let mut last_error: Option<String> = None;

        let poll = async {
            loop {
                match self.execute_js(&check).await {
                    Ok(found) if found.as_bool() == Some(true) => return,
                    Ok(_) => {}
                    Err(e) => {
                        debug!("selector check for '{selector}' failed: {e}");
                        last_error = Some(e.to_string());
                    }
                }
                tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
            }
        };

        let outcome = tokio::time::timeout(Duration::from_millis(timeout_ms), poll).await;
        match outcome {
            Ok(()) => Ok(()),
            Err(_) => Err(ScrapeError::SelectorTimeout {
                selector: selector.to_string(),
                timeout_ms,
                last_error,
            }),
        }
    }

    /// Scroll the page down by one viewport height.
    async fn scroll_by_viewport(&self) -> ScrapeResult<()> {
        self.execute_js("window.scrollBy(0, window.innerHeight)")
            .await
            .map(|_| ())
    }
}

/// Quote `s` as a JavaScript string literal.
pub(crate) fn js_string(s: &str) -> String {
    // JSON string syntax is a subset of JS string syntax.
    serde_json::Value::String(s.to_string()).to_string()
}

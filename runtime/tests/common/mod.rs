//! A scripted in-memory page standing in for Chromium.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use skimmer_runtime::renderer::{NavigationResult, RenderContext, Renderer};
use skimmer_runtime::{ScrapeError, ScrapeResult};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One interaction with the page, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String),
    CheckSelector,
    Extract,
    Scroll,
    Snapshot,
    Close,
    Shutdown,
}

/// Script for what the page does.
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    /// Extraction results, one per round. Once exhausted, `tail` repeats.
    pub rounds: VecDeque<Vec<(Option<String>, Option<String>)>>,
    /// Returned for every round after `rounds` runs out.
    pub tail: Vec<(Option<String>, Option<String>)>,
    /// Whether the listing container ever appears.
    pub selector_missing: bool,
    /// Reject this many selector checks before answering them.
    pub selector_errors: u32,
    /// Returned by `get_html`.
    pub html: String,
    /// Fail navigation with a timeout.
    pub navigation_times_out: bool,
    /// Fail the extraction script on this round (1-based).
    pub fail_on_round: Option<u32>,
}

impl PageScript {
    /// A page that yields `per_round` dated entries every round, forever.
    pub fn repeating(per_round: usize) -> Self {
        Self {
            tail: batch(per_round, "minutes ago"),
            ..Self::default()
        }
    }

    /// A page whose rounds yield exactly these batch sizes, then nothing.
    pub fn sized(sizes: &[usize]) -> Self {
        Self {
            rounds: sizes.iter().map(|&n| batch(n, "hours ago")).collect(),
            ..Self::default()
        }
    }
}

/// `n` entries titled `entry-<i>` aged `<i> <unit>`.
pub fn batch(n: usize, unit: &str) -> Vec<(Option<String>, Option<String>)> {
    (0..n)
        .map(|i| (Some(format!("entry-{i}")), Some(format!("{i} {unit}"))))
        .collect()
}

/// Shared view of what the page saw.
#[derive(Debug, Default)]
pub struct PageState {
    pub calls: Vec<Call>,
    pub extractions: u32,
    pub script: PageScript,
}

pub struct ScriptedPage {
    state: Arc<Mutex<PageState>>,
    active: Arc<AtomicUsize>,
}

impl ScriptedPage {
    pub fn new(script: PageScript) -> (Self, Arc<Mutex<PageState>>) {
        let state = Arc::new(Mutex::new(PageState {
            script,
            ..PageState::default()
        }));
        let page = Self {
            state: Arc::clone(&state),
            active: Arc::new(AtomicUsize::new(1)),
        };
        (page, state)
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl RenderContext for ScriptedPage {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> ScrapeResult<NavigationResult> {
        self.record(Call::Navigate(url.to_string()));
        if self.state.lock().unwrap().script.navigation_times_out {
            return Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms,
            });
        }
        Ok(NavigationResult {
            final_url: url.to_string(),
            load_time_ms: 12,
        })
    }

    async fn execute_js(&self, script: &str) -> ScrapeResult<Value> {
        let mut state = self.state.lock().unwrap();

        if script.starts_with("document.querySelector(") {
            state.calls.push(Call::CheckSelector);
            if state.script.selector_errors > 0 {
                state.script.selector_errors -= 1;
                return Err(ScrapeError::Script(
                    "Cannot find context with specified id".into(),
                ));
            }
            return Ok(Value::Bool(!state.script.selector_missing));
        }

        if script.starts_with("window.scrollBy(") {
            state.calls.push(Call::Scroll);
            return Ok(Value::Null);
        }

        if script.contains("querySelectorAll") {
            state.calls.push(Call::Extract);
            state.extractions += 1;
            if state.script.fail_on_round == Some(state.extractions) {
                return Err(ScrapeError::Script(
                    "Execution context was destroyed".into(),
                ));
            }
            let records = match state.script.rounds.pop_front() {
                Some(round) => round,
                None => state.script.tail.clone(),
            };
            let values: Vec<Value> = records
                .into_iter()
                .map(|(title, time)| json!({ "title": title, "time": time }))
                .collect();
            return Ok(Value::Array(values));
        }

        Err(ScrapeError::Script(format!("unexpected script: {script}")))
    }

    async fn get_html(&self) -> ScrapeResult<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Snapshot);
        Ok(state.script.html.clone())
    }

    async fn close(self: Box<Self>) -> ScrapeResult<()> {
        self.record(Call::Close);
        self.active.fetch_sub(1, Ordering::Relaxed);
        Ok(())
    }
}

/// A renderer that hands out one scripted page.
pub struct ScriptedRenderer {
    page: Mutex<Option<ScriptedPage>>,
    active: Arc<AtomicUsize>,
    state: Arc<Mutex<PageState>>,
}

impl ScriptedRenderer {
    pub fn new(script: PageScript) -> (Self, Arc<Mutex<PageState>>) {
        let (mut page, state) = ScriptedPage::new(script);
        let active = Arc::new(AtomicUsize::new(0));
        page.active = Arc::clone(&active);
        let renderer = Self {
            page: Mutex::new(Some(page)),
            active,
            state: Arc::clone(&state),
        };
        (renderer, state)
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn new_context(&self) -> ScrapeResult<Box<dyn RenderContext>> {
        let page = self
            .page
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| ScrapeError::Launch("page already handed out".into()))?;
        self.active.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(page))
    }

    async fn shutdown(&self) -> ScrapeResult<()> {
        self.state.lock().unwrap().calls.push(Call::Shutdown);
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }
}

/// Collector settings with no settle delay, for fast tests.
pub fn fast_config() -> skimmer_runtime::config::CollectorConfig {
    skimmer_runtime::config::CollectorConfig {
        settle_delay_ms: 0,
        selector_timeout_ms: 300,
        ..Default::default()
    }
}

pub fn count(state: &Arc<Mutex<PageState>>, call: &Call) -> usize {
    state
        .lock()
        .unwrap()
        .calls
        .iter()
        .filter(|c| *c == call)
        .count()
}

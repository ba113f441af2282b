// Copyright 2026 Skimmer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Progress event types and broadcast channel for collection telemetry.
//!
//! The collector emits `ProgressEvent`s as it navigates and scrolls. They flow
//! through a `tokio::sync::broadcast` channel to whoever subscribes (the CLI
//! turns them into status lines). When no subscriber exists, events are
//! silently dropped.

use crate::collector::StopReason;
use serde::{Deserialize, Serialize};

/// A progress event emitted during a collection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Monotonically increasing sequence number.
    pub seq: u64,
    /// The kind of progress event.
    pub event: ProgressEventKind,
}

/// The specific kind of progress event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProgressEventKind {
    /// Navigation to the listing page has begun.
    NavigationStarted { url: String },
    /// The listing container selector matched; extraction can begin.
    PageReady {
        final_url: String,
        load_time_ms: u64,
    },
    /// An extraction round is about to run.
    RoundStarted { round: u32 },
    /// An extraction round appended its batch.
    RoundCompleted {
        round: u32,
        appended: usize,
        total: usize,
    },
    /// The page was scrolled and the settle delay elapsed.
    Scrolled { round: u32, settle_ms: u64 },
    /// Collection finished.
    CollectionStopped {
        reason: StopReason,
        rounds: u32,
        total: usize,
    },
    /// A non-fatal warning occurred.
    Warning { message: String },
}

/// Sender handle for emitting progress events.
pub type ProgressSender = tokio::sync::broadcast::Sender<ProgressEvent>;

/// Receiver handle for consuming progress events.
pub type ProgressReceiver = tokio::sync::broadcast::Receiver<ProgressEvent>;

/// Create a new progress broadcast channel with a bounded buffer.
///
/// A run with the default guards emits well under 100 events.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    tokio::sync::broadcast::channel(256)
}

/// Emit a progress event, silently ignoring send errors (which occur when no
/// receivers are listening).
pub fn emit(tx: &Option<ProgressSender>, seq: &mut u64, event: ProgressEventKind) {
    if let Some(ref sender) = tx {
        *seq += 1;
        let _ = sender.send(ProgressEvent { seq: *seq, event });
    }
}

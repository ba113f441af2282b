//! Listing entries as they move through the pipeline.
//!
//! A [`RawEntry`] is what extraction yields: a title and the relative age text
//! as the page showed it. Normalization turns it into an [`Entry`] carrying an
//! absolute timestamp, which is what ranking orders on.

pub mod html;
pub mod selectors;

pub use selectors::ListingSelectors;

use crate::normalize::parse_relative_time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when a listing element has no title link.
pub const NO_TITLE: &str = "No title";

/// Display text for an entry whose age element was missing.
pub const NO_TIME: &str = "No time";

/// One listing element as extracted from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: String,
    /// Relative age text ("3 hours ago"), or `None` when the page had none.
    pub raw_time: Option<String>,
}

impl RawEntry {
    /// Build an entry from possibly-missing extracted fields, applying the
    /// sentinel rules.
    pub fn from_extracted(title: Option<String>, time: Option<String>) -> Self {
        Self {
            title: title.unwrap_or_else(|| NO_TITLE.to_string()),
            raw_time: time.filter(|t| t != NO_TIME),
        }
    }

    /// Resolve the relative age against `now`.
    pub fn resolve(self, now: DateTime<Utc>) -> Entry {
        let resolved_time = match &self.raw_time {
            Some(text) => parse_relative_time(text, now),
            None => DateTime::UNIX_EPOCH,
        };
        Entry {
            title: self.title,
            raw_time: self.raw_time,
            resolved_time,
        }
    }

    /// The age text to show a human.
    pub fn display_time(&self) -> &str {
        self.raw_time.as_deref().unwrap_or(NO_TIME)
    }
}

/// A listing entry with its absolute submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub raw_time: Option<String>,
    /// Epoch start when the age was missing or unrecognized.
    pub resolved_time: DateTime<Utc>,
}

impl Entry {
    pub fn display_time(&self) -> &str {
        self.raw_time.as_deref().unwrap_or(NO_TIME)
    }
}

/// Insertion-ordered entries accumulated across collection rounds.
///
/// Only ever grows. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryCollection {
    entries: Vec<RawEntry>,
}

impl EntryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a round's batch. Returns how many entries were appended.
    pub fn extend(&mut self, batch: Vec<RawEntry>) -> usize {
        let appended = batch.len();
        self.entries.extend(batch);
        appended
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawEntry> {
        self.entries.iter()
    }

    /// Resolve every entry against a single captured `now`.
    pub fn resolve(self, now: DateTime<Utc>) -> Vec<Entry> {
        self.entries.into_iter().map(|e| e.resolve(now)).collect()
    }
}

impl From<Vec<RawEntry>> for EntryCollection {
    fn from(entries: Vec<RawEntry>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sentinels_for_missing_fields() {
        let entry = RawEntry::from_extracted(None, None);
        assert_eq!(entry.title, NO_TITLE);
        assert_eq!(entry.raw_time, None);
        assert_eq!(entry.display_time(), NO_TIME);
    }

    #[test]
    fn test_no_time_text_is_absent() {
        let entry = RawEntry::from_extracted(Some("Show HN".into()), Some(NO_TIME.into()));
        assert_eq!(entry.raw_time, None);
    }

    #[test]
    fn test_resolve_uses_relative_time() {
        let entry = RawEntry::from_extracted(Some("a".into()), Some("2 hours ago".into()));
        let resolved = entry.resolve(now());
        assert_eq!(resolved.resolved_time, now() - Duration::hours(2));
    }

    #[test]
    fn test_missing_time_resolves_to_epoch() {
        let resolved = RawEntry::from_extracted(Some("a".into()), None).resolve(now());
        assert_eq!(resolved.resolved_time, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_collection_keeps_duplicates_in_order() {
        let mut collection = EntryCollection::new();
        assert!(collection.is_empty());

        let batch = vec![
            RawEntry::from_extracted(Some("first".into()), Some("1 minute ago".into())),
            RawEntry::from_extracted(Some("second".into()), None),
        ];
        assert_eq!(collection.extend(batch.clone()), 2);
        assert_eq!(collection.extend(batch), 2);
        assert_eq!(collection.len(), 4);

        let titles: Vec<&str> = collection.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "first", "second"]);
    }

    #[test]
    fn test_collection_resolves_with_one_now() {
        let collection = EntryCollection::from(vec![
            RawEntry::from_extracted(Some("a".into()), Some("0 minutes ago".into())),
            RawEntry::from_extracted(Some("b".into()), Some("0 minutes ago".into())),
        ]);
        let entries = collection.resolve(now());
        assert_eq!(entries[0].resolved_time, entries[1].resolved_time);
        assert_eq!(entries[0].resolved_time, now());
    }
}

//! Newest-first ranking of resolved entries.

use crate::listing::Entry;

/// Default number of entries kept after ranking.
pub const DEFAULT_LIMIT: usize = 100;

/// Sort by `resolved_time` descending and keep the first `limit`.
///
/// The sort is stable, so equal timestamps keep their collection order.
/// Callers should not rely on that.
pub fn rank(mut entries: Vec<Entry>, limit: usize) -> Vec<Entry> {
    entries.sort_by(|a, b| b.resolved_time.cmp(&a.resolved_time));
    entries.truncate(limit);
    entries
}

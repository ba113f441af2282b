//! Relative-age normalization: "3 hours ago" → an absolute UTC instant.
//!
//! Month and year are fixed-length (30 and 365 days). No calendar arithmetic.

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Units understood in a relative age, singular or plural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Parse a unit word. Anything not listed (including "second") is `None`.
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "minute" | "minutes" => Some(Self::Minute),
            "hour" | "hours" => Some(Self::Hour),
            "day" | "days" => Some(Self::Day),
            "week" | "weeks" => Some(Self::Week),
            "month" | "months" => Some(Self::Month),
            "year" | "years" => Some(Self::Year),
            _ => None,
        }
    }

    /// Length of one unit in seconds.
    pub const fn seconds(self) -> i64 {
        const DAY: i64 = 24 * 60 * 60;
        match self {
            Self::Minute => 60,
            Self::Hour => 60 * 60,
            Self::Day => DAY,
            Self::Week => 7 * DAY,
            Self::Month => 30 * DAY,
            Self::Year => 365 * DAY,
        }
    }
}

fn relative_time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+)\s(\w+)\sago").expect("static pattern"))
}

/// Convert `<N> <unit> ago` to `now - N * unit`.
///
/// The pattern may appear anywhere in `text`. Unrecognized input, unknown
/// units and out-of-range values all resolve to the Unix epoch start, so the
/// entry sorts last rather than failing the run.
pub fn parse_relative_time(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(caps) = relative_time_regex().captures(text) else {
        return DateTime::UNIX_EPOCH;
    };
    let Ok(value) = caps[1].parse::<i64>() else {
        return DateTime::UNIX_EPOCH;
    };
    let Some(unit) = TimeUnit::parse(&caps[2]) else {
        return DateTime::UNIX_EPOCH;
    };

    value
        .checked_mul(unit.seconds())
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// [`parse_relative_time`] against the current wall clock.
pub fn parse_relative_time_now(text: &str) -> DateTime<Utc> {
    parse_relative_time(text, Utc::now())
}

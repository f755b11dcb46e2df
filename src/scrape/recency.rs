//! Age estimation from relative posted-time text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{DAY_AGE_HOURS, FRESHNESS_WINDOW_HOURS, UNKNOWN_AGE_HOURS};

/// ASCII digits directly followed by an hour marker, e.g. `3h`, `12 hours`.
static HOURS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*h").expect("valid regex"));

/// Estimate how many hours ago a posting went up.
///
/// Rules are applied in order:
/// 1. `<digits><whitespace?>h` yields the digits as hours.
/// 2. Any text containing `day` is 24 hours old, whatever the day count.
/// 3. Anything else is [`UNKNOWN_AGE_HOURS`] old.
#[must_use]
pub fn hours_since_posted(posted_text: &str) -> u32 {
    if let Some(caps) = HOURS_PATTERN.captures(posted_text) {
        // Only digits are captured, so the parse can only fail on overflow.
        return caps[1].parse().unwrap_or(u32::MAX);
    }
    if posted_text.contains("day") {
        return DAY_AGE_HOURS;
    }
    UNKNOWN_AGE_HOURS
}

/// Whether an age falls inside the freshness window (inclusive).
#[must_use]
pub fn is_fresh(hours_since_posted: u32) -> bool {
    hours_since_posted <= FRESHNESS_WINDOW_HOURS
}

//! Timestamp parsing.
//!
//! Timestamps are accepted in three layouts, tried in order:
//!
//! * `2024-01-01T12:30:00+00:00`
//! * `2024-01-01T12:30:00Z`
//! * `2024-01-01T12:30:00`
//!
//! The `+00:00` and `Z` suffixes are literal UTC markers, so all three layouts describe the same
//! zone-less instant. A string matching none of them parses to `None` rather than an error;
//! callers decide whether an absent timestamp is fatal.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Duration, PrimitiveDateTime};

/// A zone-less point in time.
pub type Timestamp = PrimitiveDateTime;

/// Accepted layouts, in priority order.
const FORMATS: [&[FormatItem<'static>]; 3] = [
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]+00:00"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
];

/// Parse a timestamp in any accepted layout.
///
/// Returns the first successful parse, or `None` if the text matches no layout.
pub fn parse(text: &str) -> Option<Timestamp> {
    FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(text, *format).ok())
}

/// Absolute duration between two timestamps.
pub fn distance(a: Timestamp, b: Timestamp) -> Duration {
    (a - b).abs()
}

//! Rendering of stored UTC timestamps in the display timezone.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Format used for timestamps in API responses.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builds a fixed offset from minutes east of UTC, falling back to UTC when
/// the value is out of range.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}

/// Formats `ts` in `offset` using [`DISPLAY_FORMAT`].
pub fn format_display(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format(DISPLAY_FORMAT).to_string()
}

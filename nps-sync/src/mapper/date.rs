//! Date normalization.

use chrono::{DateTime, SecondsFormat, Utc};

/// Calendar date (UTC) of an instant as `YYYY-MM-DD`, or `None` when there is
/// no instant.
pub fn normalize_date(instant: Option<DateTime<Utc>>) -> Option<String> {
    instant.map(|t| t.format("%Y-%m-%d").to_string())
}

/// Full RFC 3339 rendering used when a survey has no date of its own,
/// e.g. `2024-03-15T10:00:00.000Z`.
pub fn processing_instant(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

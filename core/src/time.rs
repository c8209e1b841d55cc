//! Time related utils.

use crate::Error;
use chrono::Utc;

/// DateTime used by signers, always in UTC.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a new DateTime for the current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format time into ISO8601 basic format: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Parse time from RFC3339: `2022-03-13T07:20:04Z`
pub fn parse_rfc3339(s: &str) -> crate::Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::unexpected(format!("failed to parse time {s}")).with_source(e))
}

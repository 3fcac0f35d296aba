use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::Serialize;

/// Offset-less layouts accepted after RFC3339 parsing fails
const NAIVE_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// A point in time as recorded in a rollout file.
///
/// Inputs without an offset, and dates recovered from the file path, stay naive
/// instead of being pinned to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl Timestamp {
    /// Instant used for ordering sessions. Naive values are read as local time.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Timestamp::Zoned(dt) => dt.with_timezone(&Utc),
            Timestamp::Naive(naive) => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| naive.and_utc()),
        }
    }
}

/// Calendar date taken from a `.../YYYY/MM/DD/<file>` path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl PathDate {
    /// Midnight of this date, or `None` when the day does not exist (e.g. Feb 31)
    pub fn start_of_day(&self) -> Option<Timestamp> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Timestamp::Naive)
    }
}

/// Parse an ISO-8601 timestamp.
///
/// A trailing `Z` is treated as `+00:00`. Anything unparsable yields `None`;
/// timestamps are never a reason to reject a record.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let text = value.trim();
    if text.is_empty() {
        return None;
    }

    let normalized: Cow<'_, str> = match text.strip_suffix('Z') {
        Some(stripped) => Cow::Owned(format!("{stripped}+00:00")),
        None => Cow::Borrowed(text),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(Timestamp::Zoned(dt));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(Timestamp::Naive(naive));
        }
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Timestamp::Naive)
}

/// Format a timestamp for one-line display.
///
/// - Zoned: converted to UTC, `2024-03-07 10:15:00Z`
/// - Naive: ISO form, `2024-03-07T00:00:00`
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    match timestamp {
        Timestamp::Zoned(dt) => dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%SZ").to_string(),
        Timestamp::Naive(naive) if naive.nanosecond() == 0 => {
            naive.format("%Y-%m-%dT%H:%M:%S").to_string()
        }
        Timestamp::Naive(naive) => naive.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
    }
}

/// Extract the date from a rollout path laid out as `.../YYYY/MM/DD/<file>`.
///
/// The three directories directly above the file must be a 4-digit year and
/// 2-digit month and day, with month in 1..=12 and day in 1..=31.
pub fn parse_date_from_path(path: &Path) -> Option<PathDate> {
    let parts: Vec<&OsStr> = path.iter().collect();
    if parts.len() < 4 {
        return None;
    }
    let n = parts.len();

    let year = parse_digits(parts[n - 4], 4)?;
    let month = parse_digits(parts[n - 3], 2)?;
    let day = parse_digits(parts[n - 2], 2)?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    Some(PathDate { year: year as i32, month, day })
}

fn parse_digits(part: &OsStr, width: usize) -> Option<u32> {
    let text = part.to_str()?;
    if text.len() != width || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

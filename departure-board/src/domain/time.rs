//! Departure time handling for upstream boards.
//!
//! The upstream reports times as free-form strings, usually RFC 3339. This
//! module turns them into points in time and back into `HH:MM` display
//! strings. Parsing is total: anything that does not describe a real
//! instant comes back as `None`, so one garbled field never takes a whole
//! board down with it.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, LocalResult, NaiveDateTime, TimeZone};

/// A parsed upstream point in time, keeping the offset the upstream sent.
pub type Timestamp = DateTime<FixedOffset>;

/// Display format for departure times on a board.
pub const DISPLAY_FORMAT: &str = "%H:%M";

/// Layouts tried when the upstream omits the UTC offset.
///
/// Such strings are read as wall-clock time in the zone passed to
/// [`parse_timestamp_in`] (the process local zone for [`parse_timestamp`]).
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an upstream timestamp, reading offset-less strings as local time.
///
/// # Examples
///
/// ```
/// use departure_board::domain::parse_timestamp;
///
/// assert!(parse_timestamp(Some("2024-01-01T14:23:00Z")).is_some());
/// assert!(parse_timestamp(Some("2024-01-01T14:23:00+01:00")).is_some());
///
/// assert!(parse_timestamp(None).is_none());
/// assert!(parse_timestamp(Some("")).is_none());
/// assert!(parse_timestamp(Some("soon")).is_none());
/// assert!(parse_timestamp(Some("2024-02-30T10:00:00Z")).is_none());
/// ```
pub fn parse_timestamp(input: Option<&str>) -> Option<Timestamp> {
    parse_timestamp_in(input, &Local)
}

/// Parse an upstream timestamp, reading offset-less strings in `tz`.
///
/// A naive time that does not exist in `tz`, or exists twice (around a DST
/// change), is treated as absent.
pub fn parse_timestamp_in<Tz: TimeZone>(input: Option<&str>, tz: &Tz) -> Option<Timestamp> {
    let s = input?.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.fixed_offset()),
        _ => None,
    }
}

/// Format a timestamp as `HH:MM` in the process local zone.
pub fn format_local(ts: &Timestamp) -> String {
    format_in(ts, &Local)
}

/// Format a timestamp as `HH:MM` in `tz`.
pub fn format_in<Tz>(ts: &Timestamp, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    ts.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}

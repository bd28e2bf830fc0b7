//! Delay resolution.
//!
//! A departure's delay comes from one of two places: the upstream's own
//! delay figure, or the gap between scheduled and predicted departure.
//! The upstream figure wins whenever it declares itself available, because
//! it can reflect schedule adjustments the client never sees.

use super::time::Timestamp;

const MILLIS_PER_MINUTE: u64 = 60_000;

/// Delay figure as reported by the upstream, before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExplicitDelay {
    /// Whether the upstream vouches for `minutes`.
    pub is_available: bool,

    /// Whole minutes of delay, if the upstream sent a number.
    pub minutes: Option<i64>,
}

impl ExplicitDelay {
    /// The usable delay, if the upstream declared one.
    pub fn declared(&self) -> Option<i64> {
        if self.is_available { self.minutes } else { None }
    }
}

/// Resolve the signed delay in minutes (positive means late).
///
/// Priority:
/// 1. an available explicit delay with a numeric value, used verbatim;
/// 2. `predicted - scheduled`, rounded to the nearest minute;
/// 3. zero.
///
/// # Examples
///
/// ```
/// use departure_board::domain::{ExplicitDelay, parse_timestamp, resolve_delay};
///
/// let scheduled = parse_timestamp(Some("2024-01-01T14:23:00Z"));
/// let predicted = parse_timestamp(Some("2024-01-01T14:26:00Z"));
///
/// assert_eq!(resolve_delay(None, scheduled.as_ref(), predicted.as_ref()), 3);
///
/// let explicit = ExplicitDelay { is_available: true, minutes: Some(1) };
/// assert_eq!(resolve_delay(Some(&explicit), scheduled.as_ref(), predicted.as_ref()), 1);
///
/// assert_eq!(resolve_delay(None, scheduled.as_ref(), None), 0);
/// ```
pub fn resolve_delay(
    explicit: Option<&ExplicitDelay>,
    scheduled: Option<&Timestamp>,
    predicted: Option<&Timestamp>,
) -> i64 {
    if let Some(minutes) = explicit.and_then(ExplicitDelay::declared) {
        return minutes;
    }

    match (scheduled, predicted) {
        (Some(scheduled), Some(predicted)) => minutes_between(scheduled, predicted),
        _ => 0,
    }
}

/// Whole minutes from `from` to `to`, rounding half away from zero.
///
/// So +30 s is 1 minute late and -30 s is 1 minute early; +29.999 s is 0.
pub fn minutes_between(from: &Timestamp, to: &Timestamp) -> i64 {
    let millis = to.signed_duration_since(*from).num_milliseconds();
    let rounded = (millis.unsigned_abs() + MILLIS_PER_MINUTE / 2) / MILLIS_PER_MINUTE;
    // At most i64::MAX / 60_000, so the cast cannot wrap.
    let rounded = rounded as i64;
    if millis < 0 { -rounded } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time::parse_timestamp_in;
    use chrono::Utc;

    fn ts(s: &str) -> Timestamp {
        parse_timestamp_in(Some(s), &Utc).unwrap()
    }

    #[test]
    fn explicit_delay_wins_over_timestamps() {
        let explicit = ExplicitDelay {
            is_available: true,
            minutes: Some(5),
        };
        let delay = resolve_delay(
            Some(&explicit),
            Some(&ts("2024-01-01T14:23:00Z")),
            Some(&ts("2024-01-01T14:24:00Z")),
        );
        assert_eq!(delay, 5);
    }

    #[test]
    fn explicit_delay_used_without_timestamps() {
        let explicit = ExplicitDelay {
            is_available: true,
            minutes: Some(-2),
        };
        assert_eq!(resolve_delay(Some(&explicit), None, None), -2);
    }

    #[test]
    fn unavailable_explicit_delay_falls_back() {
        let explicit = ExplicitDelay {
            is_available: false,
            minutes: Some(9),
        };
        let delay = resolve_delay(
            Some(&explicit),
            Some(&ts("2024-01-01T14:23:00Z")),
            Some(&ts("2024-01-01T14:25:00Z")),
        );
        assert_eq!(delay, 2);
    }

    #[test]
    fn available_but_non_numeric_falls_back() {
        let explicit = ExplicitDelay {
            is_available: true,
            minutes: None,
        };
        let delay = resolve_delay(
            Some(&explicit),
            Some(&ts("2024-01-01T14:23:00Z")),
            Some(&ts("2024-01-01T14:20:00Z")),
        );
        assert_eq!(delay, -3);
    }

    #[test]
    fn missing_timestamp_is_zero() {
        let scheduled = ts("2024-01-01T14:23:00Z");
        assert_eq!(resolve_delay(None, Some(&scheduled), None), 0);
        assert_eq!(resolve_delay(None, None, Some(&scheduled)), 0);
        assert_eq!(resolve_delay(None, None, None), 0);
    }

    #[test]
    fn half_minutes_round_away_from_zero() {
        let base = ts("2024-01-01T14:00:00Z");
        assert_eq!(minutes_between(&base, &ts("2024-01-01T14:00:30Z")), 1);
        assert_eq!(minutes_between(&base, &ts("2024-01-01T13:59:30Z")), -1);
        assert_eq!(minutes_between(&base, &ts("2024-01-01T14:00:29Z")), 0);
        assert_eq!(minutes_between(&base, &ts("2024-01-01T13:59:31Z")), 0);
        assert_eq!(minutes_between(&base, &ts("2024-01-01T14:01:29Z")), 1);
        assert_eq!(minutes_between(&base, &ts("2024-01-01T14:01:30Z")), 2);
    }

    #[test]
    fn offsets_are_respected() {
        let scheduled = ts("2024-01-01T14:23:00Z");
        let predicted = ts("2024-01-01T15:26:00+01:00");
        assert_eq!(minutes_between(&scheduled, &predicted), 3);
    }
}

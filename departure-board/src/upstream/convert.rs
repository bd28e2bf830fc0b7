//! Conversion from upstream departures to canonical [`Departure`]s.
//!
//! Each logical field is read through an ordered list of JSON pointers (a
//! [`FieldRule`]); the first pointer that yields usable text wins. Nothing
//! here fails: missing or malformed data resolves to the `"-"`
//! placeholder, an absent time, or a zero delay.

use std::fmt;

use chrono::{Local, TimeZone};
use serde_json::Value;
use tracing::debug;

use crate::domain::{Departure, ExplicitDelay, format_in, parse_timestamp_in, resolve_delay};

use super::types::RawDeparture;

/// Shown when a label cannot be resolved.
pub const PLACEHOLDER: &str = "-";

/// Ordered extraction rule for one logical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Logical field name, for diagnostics.
    pub name: &'static str,

    /// JSON pointers tried in order.
    pub pointers: &'static [&'static str],
}

impl FieldRule {
    /// Resolve the field, trying each pointer in turn.
    ///
    /// Strings are trimmed and must be non-empty; numbers are rendered as
    /// text (some feeds send line `7` rather than `"7"`). Anything else is
    /// skipped.
    pub fn resolve(&self, raw: &RawDeparture) -> Option<String> {
        self.pointers
            .iter()
            .find_map(|pointer| raw.get(pointer).and_then(text_value))
    }

    /// Resolve the field, or fall back to [`PLACEHOLDER`].
    pub fn resolve_or_placeholder(&self, raw: &RawDeparture) -> String {
        self.resolve(raw).unwrap_or_else(|| {
            debug!(field = self.name, "no usable value, showing placeholder");
            PLACEHOLDER.to_string()
        })
    }
}

/// Route or line label.
pub const LINE: FieldRule = FieldRule {
    name: "line",
    pointers: &[
        "/route/short_name",
        "/route/shortName",
        "/route/name",
        "/line/name",
        "/line",
    ],
};

/// Destination or headsign.
pub const DIRECTION: FieldRule = FieldRule {
    name: "direction",
    pointers: &[
        "/trip/headsign",
        "/trip/tripHeadsign",
        "/headsign",
        "/direction",
        "/destination",
    ],
};

/// Scheduled departure timestamp.
pub const SCHEDULED: FieldRule = FieldRule {
    name: "scheduled",
    pointers: &[
        "/departure_timestamp/scheduled",
        "/departure/timestamp_scheduled",
        "/scheduled",
    ],
};

/// Predicted departure timestamp.
pub const PREDICTED: FieldRule = FieldRule {
    name: "predicted",
    pointers: &[
        "/departure_timestamp/predicted",
        "/departure/timestamp_predicted",
        "/predicted",
    ],
};

/// Pointer to the upstream's own delay sub-object.
const DELAY_POINTER: &str = "/delay";

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read the upstream's explicit delay sub-object, if present.
///
/// `is_available` must be a JSON `true`. `minutes` must be a number;
/// fractional values round half away from zero.
pub fn explicit_delay(raw: &RawDeparture) -> Option<ExplicitDelay> {
    let delay = raw.get(DELAY_POINTER)?.as_object()?;

    let is_available = delay
        .get("is_available")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let minutes = delay.get("minutes").and_then(numeric_minutes);

    Some(ExplicitDelay {
        is_available,
        minutes,
    })
}

fn numeric_minutes(value: &Value) -> Option<i64> {
    if let Some(minutes) = value.as_i64() {
        return Some(minutes);
    }
    let minutes = value.as_f64()?.round();
    // Excludes u64 values beyond i64 range.
    (minutes.abs() < i64::MAX as f64).then_some(minutes as i64)
}

/// Normalize one departure, formatting times in the local zone.
pub fn convert_departure(raw: &RawDeparture, index: usize) -> Departure {
    convert_departure_in(raw, index, &Local)
}

/// Normalize one departure, reading and formatting times in `tz`.
///
/// Pure: the same record, index and zone always give the same result.
pub fn convert_departure_in<Tz>(raw: &RawDeparture, index: usize, tz: &Tz) -> Departure
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let scheduled = parse_timestamp_in(SCHEDULED.resolve(raw).as_deref(), tz);
    let predicted = parse_timestamp_in(PREDICTED.resolve(raw).as_deref(), tz);
    let delay_minutes = resolve_delay(
        explicit_delay(raw).as_ref(),
        scheduled.as_ref(),
        predicted.as_ref(),
    );

    Departure {
        id: index.to_string(),
        line: LINE.resolve_or_placeholder(raw),
        direction: DIRECTION.resolve_or_placeholder(raw),
        planned_time: scheduled.map(|t| format_in(&t, tz)),
        actual_time: predicted.map(|t| format_in(&t, tz)),
        delay_minutes,
    }
}

/// Normalize a fetched batch, keeping upstream order and at most `limit`
/// departures.
pub fn convert_board(raw: &[RawDeparture], limit: usize) -> Vec<Departure> {
    convert_board_in(raw, limit, &Local)
}

/// As [`convert_board`], reading and formatting times in `tz`.
pub fn convert_board_in<Tz>(raw: &[RawDeparture], limit: usize, tz: &Tz) -> Vec<Departure>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    raw.iter()
        .take(limit)
        .enumerate()
        .map(|(index, departure)| convert_departure_in(departure, index, tz))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn raw(value: Value) -> RawDeparture {
        RawDeparture::new(value)
    }

    #[test]
    fn converts_reference_record() {
        let departure = raw(json!({
            "route": {"short_name": "7"},
            "trip": {"headsign": "Airport"},
            "departure_timestamp": {
                "scheduled": "2024-01-01T14:23:00Z",
                "predicted": "2024-01-01T14:26:00Z"
            }
        }));

        let result = convert_departure_in(&departure, 0, &Utc);

        assert_eq!(result.id, "0");
        assert_eq!(result.line, "7");
        assert_eq!(result.direction, "Airport");
        assert_eq!(result.planned_time.as_deref(), Some("14:23"));
        assert_eq!(result.actual_time.as_deref(), Some("14:26"));
        assert_eq!(result.delay_minutes, 3);
    }

    #[test]
    fn explicit_delay_is_authoritative() {
        let departure = raw(json!({
            "route": {"short_name": "22"},
            "trip": {"headsign": "Bílá Hora"},
            "delay": {"is_available": true, "minutes": 1, "seconds": 75},
            "departure_timestamp": {
                "scheduled": "2024-01-01T14:23:00Z",
                "predicted": "2024-01-01T14:30:00Z"
            }
        }));

        assert_eq!(convert_departure_in(&departure, 0, &Utc).delay_minutes, 1);
    }

    #[test]
    fn unavailable_explicit_delay_uses_timestamps() {
        let departure = raw(json!({
            "delay": {"is_available": false, "minutes": null},
            "departure_timestamp": {
                "scheduled": "2024-01-01T14:23:00Z",
                "predicted": "2024-01-01T14:25:00Z"
            }
        }));

        assert_eq!(convert_departure_in(&departure, 0, &Utc).delay_minutes, 2);
    }

    #[test]
    fn non_boolean_availability_is_not_available() {
        let departure = raw(json!({
            "delay": {"is_available": "yes", "minutes": 9}
        }));

        assert_eq!(convert_departure_in(&departure, 0, &Utc).delay_minutes, 0);
    }

    #[test]
    fn fractional_explicit_minutes_round() {
        let departure = raw(json!({"delay": {"is_available": true, "minutes": 2.5}}));
        assert_eq!(convert_departure_in(&departure, 0, &Utc).delay_minutes, 3);

        let departure = raw(json!({"delay": {"is_available": true, "minutes": -2.5}}));
        assert_eq!(convert_departure_in(&departure, 0, &Utc).delay_minutes, -3);
    }

    #[test]
    fn empty_record_uses_placeholders() {
        let result = convert_departure_in(&raw(json!({})), 4, &Utc);

        assert_eq!(result.id, "4");
        assert_eq!(result.line, PLACEHOLDER);
        assert_eq!(result.direction, PLACEHOLDER);
        assert_eq!(result.planned_time, None);
        assert_eq!(result.actual_time, None);
        assert_eq!(result.delay_minutes, 0);
    }

    #[test]
    fn rule_resolves_or_falls_back() {
        let departure = raw(json!({"route": {"short_name": " 22 "}, "headsign": ""}));

        assert_eq!(LINE.resolve_or_placeholder(&departure), "22");
        assert_eq!(DIRECTION.resolve_or_placeholder(&departure), PLACEHOLDER);
        assert_eq!(LINE.name, "line");
        assert_eq!(DIRECTION.name, "direction");
    }

    #[test]
    fn non_object_record_uses_placeholders() {
        for value in [json!(null), json!(42), json!("x"), json!([1, 2])] {
            let result = convert_departure_in(&raw(value), 0, &Utc);
            assert_eq!(result.line, PLACEHOLDER);
            assert_eq!(result.delay_minutes, 0);
        }
    }

    #[test]
    fn line_fallback_order() {
        let departure = raw(json!({
            "route": {"short_name": "", "name": "Tram 9"},
            "line": "9"
        }));
        assert_eq!(LINE.resolve(&departure).as_deref(), Some("Tram 9"));

        let departure = raw(json!({"route": {"shortName": "A"}}));
        assert_eq!(LINE.resolve(&departure).as_deref(), Some("A"));

        let departure = raw(json!({"line": {"name": "S49"}}));
        assert_eq!(LINE.resolve(&departure).as_deref(), Some("S49"));

        let departure = raw(json!({"line": 136}));
        assert_eq!(LINE.resolve(&departure).as_deref(), Some("136"));
    }

    #[test]
    fn direction_fallback_order() {
        let departure = raw(json!({"trip": {"tripHeadsign": "Sídliště Ďáblice"}}));
        assert_eq!(
            DIRECTION.resolve(&departure).as_deref(),
            Some("Sídliště Ďáblice")
        );

        let departure = raw(json!({"trip": {"headsign": null}, "direction": "Centrum"}));
        assert_eq!(DIRECTION.resolve(&departure).as_deref(), Some("Centrum"));

        let departure = raw(json!({"destination": "  Depo Hostivař  "}));
        assert_eq!(
            DIRECTION.resolve(&departure).as_deref(),
            Some("Depo Hostivař")
        );
    }

    #[test]
    fn wrong_typed_fields_are_skipped() {
        let departure = raw(json!({
            "route": {"short_name": {"nested": true}},
            "trip": ["Airport"],
            "departure_timestamp": {"scheduled": 1704118980, "predicted": true}
        }));

        let result = convert_departure_in(&departure, 0, &Utc);
        assert_eq!(result.line, PLACEHOLDER);
        assert_eq!(result.direction, PLACEHOLDER);
        assert_eq!(result.planned_time, None);
        assert_eq!(result.actual_time, None);
        assert_eq!(result.delay_minutes, 0);
    }

    #[test]
    fn unparseable_predicted_time_gives_zero_delay() {
        let departure = raw(json!({
            "departure_timestamp": {
                "scheduled": "2024-01-01T14:23:00Z",
                "predicted": "garbage"
            }
        }));

        let result = convert_departure_in(&departure, 0, &Utc);
        assert_eq!(result.planned_time.as_deref(), Some("14:23"));
        assert_eq!(result.actual_time, None);
        assert_eq!(result.delay_minutes, 0);
    }

    #[test]
    fn alternative_timestamp_paths() {
        let departure = raw(json!({
            "departure": {
                "timestamp_scheduled": "2024-01-01T08:00:00Z",
                "timestamp_predicted": "2024-01-01T07:59:00Z"
            }
        }));

        let result = convert_departure_in(&departure, 0, &Utc);
        assert_eq!(result.planned_time.as_deref(), Some("08:00"));
        assert_eq!(result.delay_minutes, -1);
    }

    #[test]
    fn board_keeps_order_and_truncates() {
        let batch: Vec<RawDeparture> = (0..10)
            .map(|n| raw(json!({"route": {"short_name": n.to_string()}})))
            .collect();

        let departures = convert_board_in(&batch, 6, &Utc);

        assert_eq!(departures.len(), 6);
        let lines: Vec<&str> = departures.iter().map(|d| d.line.as_str()).collect();
        assert_eq!(lines, ["0", "1", "2", "3", "4", "5"]);
        let ids: Vec<&str> = departures.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["0", "1", "2", "3", "4", "5"]);
    }

    #[test]
    fn board_shorter_than_limit() {
        let batch = vec![raw(json!({"line": "1"}))];
        assert_eq!(convert_board_in(&batch, 12, &Utc).len(), 1);
        assert!(convert_board_in(&[], 12, &Utc).is_empty());
    }
}

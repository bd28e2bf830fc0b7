//! Canonical departure record.

use std::fmt;

use serde::Serialize;

/// One normalized departure, ready for display.
///
/// Every field is always populated: unresolvable labels become `"-"`,
/// unparseable times become `None`, and an unknown delay is `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    /// Identifier, stable within one fetch batch.
    pub id: String,

    /// Route or line label (e.g. "7").
    pub line: String,

    /// Destination or headsign (e.g. "Airport").
    pub direction: String,

    /// Scheduled departure as `HH:MM` local time.
    pub planned_time: Option<String>,

    /// Predicted departure as `HH:MM` local time.
    pub actual_time: Option<String>,

    /// Signed delay in minutes; positive means late.
    pub delay_minutes: i64,
}

impl Departure {
    /// How this departure compares to its timetable.
    pub fn punctuality(&self) -> Punctuality {
        Punctuality::from_delay(self.delay_minutes)
    }
}

/// Punctuality of a departure, derived from its delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuality {
    /// Leaving this many minutes ahead of schedule.
    Early(u64),
    OnTime,
    /// Leaving this many minutes behind schedule.
    Delayed(u64),
}

impl Punctuality {
    pub fn from_delay(delay_minutes: i64) -> Self {
        match delay_minutes {
            0 => Punctuality::OnTime,
            d if d < 0 => Punctuality::Early(d.unsigned_abs()),
            d => Punctuality::Delayed(d.unsigned_abs()),
        }
    }

    /// Short text shown next to a departure.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Punctuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Punctuality::Early(mins) => write!(f, "{mins}min early"),
            Punctuality::OnTime => write!(f, "On time"),
            Punctuality::Delayed(mins) => write!(f, "+{mins}min"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuality_from_delay() {
        assert_eq!(Punctuality::from_delay(0), Punctuality::OnTime);
        assert_eq!(Punctuality::from_delay(3), Punctuality::Delayed(3));
        assert_eq!(Punctuality::from_delay(-1), Punctuality::Early(1));
    }

    #[test]
    fn punctuality_labels() {
        assert_eq!(Punctuality::OnTime.label(), "On time");
        assert_eq!(Punctuality::Delayed(5).label(), "+5min");
        assert_eq!(Punctuality::Early(2).label(), "2min early");
    }

    #[test]
    fn serializes_camel_case() {
        let departure = Departure {
            id: "0".to_string(),
            line: "7".to_string(),
            direction: "Airport".to_string(),
            planned_time: Some("14:23".to_string()),
            actual_time: None,
            delay_minutes: 3,
        };

        let json = serde_json::to_value(&departure).unwrap();
        assert_eq!(json["line"], "7");
        assert_eq!(json["plannedTime"], "14:23");
        assert!(json["actualTime"].is_null());
        assert_eq!(json["delayMinutes"], 3);
        assert_eq!(departure.punctuality(), Punctuality::Delayed(3));
    }
}

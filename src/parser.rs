//! Field parsers for route rows: stop sequences and start times.

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::table::RouteRecord;

/// Separator between intermediate stop names.
pub const STOP_DELIMITER: &str = " - ";

/// Builds the ordered stop list `[start] + intermediate + [final]`.
///
/// Returns an empty sequence when the intermediate stoppages are absent;
/// the row is kept, only its derived values degrade. An absent endpoint
/// still takes its slot as an empty name, so it counts toward the stop
/// total. Names are neither trimmed nor deduplicated.
pub fn parse_stops(record: &RouteRecord) -> Vec<String> {
    let Some(intermediate) = record.intermediate_stoppages.as_deref() else {
        return Vec::new();
    };

    let endpoint = |stop: &Option<String>| stop.clone().unwrap_or_default();

    std::iter::once(endpoint(&record.starting_point))
        .chain(intermediate.split(STOP_DELIMITER).map(str::to_string))
        .chain(std::iter::once(endpoint(&record.final_stoppage)))
        .collect()
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%m-%Y %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M %p"];

/// A naive departure time, with or without a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTime {
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

impl StartTime {
    /// Parses a start-time cell. No timezone conversion is applied.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        DATETIME_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
            .map(StartTime::DateTime)
            .or_else(|| {
                TIME_FORMATS
                    .iter()
                    .find_map(|f| NaiveTime::parse_from_str(raw, f).ok())
                    .map(StartTime::Time)
            })
    }

    pub fn hour(&self) -> u32 {
        match self {
            StartTime::DateTime(dt) => dt.hour(),
            StartTime::Time(t) => t.hour(),
        }
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            StartTime::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
        }
    }
}

impl Serialize for StartTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StartTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        StartTime::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized start time: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(start: Option<&str>, mid: Option<&str>, end: Option<&str>) -> RouteRecord {
        RouteRecord {
            route_number: "12".to_string(),
            starting_point: start.map(str::to_string),
            intermediate_stoppages: mid.map(str::to_string),
            final_stoppage: end.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_stops_in_travel_order() {
        let r = record(Some("Patia"), Some("A - B - C"), Some("Master Canteen"));
        assert_eq!(parse_stops(&r), vec!["Patia", "A", "B", "C", "Master Canteen"]);
    }

    #[test]
    fn test_parse_stops_missing_intermediate_is_empty() {
        let r = record(Some("Patia"), None, Some("Master Canteen"));
        assert!(parse_stops(&r).is_empty());
    }

    #[test]
    fn test_parse_stops_exact_delimiter_only() {
        // Only " - " splits; bare hyphens stay inside names and nothing is trimmed.
        let r = record(Some("S"), Some("Kalpana-Square -  Rasulgarh"), Some("E"));
        assert_eq!(
            parse_stops(&r),
            vec!["S", "Kalpana-Square", " Rasulgarh", "E"]
        );
    }

    #[test]
    fn test_parse_stops_keeps_duplicates() {
        let r = record(Some("A"), Some("A - B"), Some("A"));
        assert_eq!(parse_stops(&r), vec!["A", "A", "B", "A"]);
    }

    #[test]
    fn test_parse_stops_missing_endpoint_keeps_slot() {
        let r = record(None, Some("A - B"), Some("E"));
        assert_eq!(parse_stops(&r), vec!["", "A", "B", "E"]);

        let r = record(Some("A"), Some("B - C"), None);
        assert_eq!(parse_stops(&r), vec!["A", "B", "C", ""]);
        assert_eq!(parse_stops(&r).len(), 4);
    }

    #[test]
    fn test_start_time_formats() {
        assert_eq!(StartTime::parse("08:00").map(|t| t.hour()), Some(8));
        assert_eq!(StartTime::parse("17:30:00").map(|t| t.hour()), Some(17));
        assert_eq!(StartTime::parse("5:45 PM").map(|t| t.hour()), Some(17));
        assert_eq!(
            StartTime::parse("2024-03-01 09:15").map(|t| t.hour()),
            Some(9)
        );
        assert_eq!(
            StartTime::parse("2024-03-01T18:00:00").map(|t| t.hour()),
            Some(18)
        );
    }

    #[test]
    fn test_start_time_rejects_garbage() {
        assert!(StartTime::parse("soon").is_none());
        assert!(StartTime::parse("").is_none());
        assert!(StartTime::parse("25:00").is_none());
    }

    #[test]
    fn test_start_time_display_reparses() {
        for raw in ["07:59", "2024-03-01 09:15"] {
            let parsed = StartTime::parse(raw).unwrap();
            assert_eq!(StartTime::parse(&parsed.to_string()), Some(parsed));
        }
        assert_eq!(StartTime::parse("07:59").unwrap().to_string(), "07:59:00");
    }
}

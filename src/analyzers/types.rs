//! Data types produced by the analysis pipeline.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::parser::StartTime;

/// Static classification of a route number against the membership lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityRouteType {
    #[serde(rename = "In-City")]
    InCity,
    #[serde(rename = "Out-City")]
    OutCity,
    Unknown,
}

impl CityRouteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CityRouteType::InCity => "In-City",
            CityRouteType::OutCity => "Out-City",
            CityRouteType::Unknown => "Unknown",
        }
    }
}

/// Stop-count class relative to the batch threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteLengthClass {
    #[serde(rename = "Long Route")]
    Long,
    #[serde(rename = "Short Route")]
    Short,
}

impl RouteLengthClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteLengthClass::Long => "Long Route",
            RouteLengthClass::Short => "Short Route",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupancyStatus {
    Overcrowded,
    Underutilized,
    Optimal,
}

impl OccupancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OccupancyStatus::Overcrowded => "Overcrowded",
            OccupancyStatus::Underutilized => "Underutilized",
            OccupancyStatus::Optimal => "Optimal",
        }
    }
}

macro_rules! display_as_str {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(CityRouteType, RouteLengthClass, OccupancyStatus);

/// Columns appended to every exported row, in export order.
pub const DERIVED_COLUMNS: [&str; 8] = [
    "City Route Type",
    "Stop Sequence",
    "Number of Stops",
    "Route Type",
    "Handover Points",
    "Peak Hour",
    "Occupancy",
    "Occupancy Status",
];

/// Derived values for one route row.
///
/// `occupancy_percent` is simulated from a seeded generator, not measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRoute {
    #[serde(rename = "Route No.")]
    pub route_number: String,
    #[serde(rename = "City Route Type")]
    pub city_route_type: CityRouteType,
    #[serde(rename = "Stop Sequence", with = "stop_sequence_column")]
    pub stop_sequence: Vec<String>,
    #[serde(rename = "Number of Stops")]
    pub stop_count: usize,
    #[serde(rename = "Route Type")]
    pub route_length_class: RouteLengthClass,
    #[serde(rename = "Handover Points")]
    pub handover_point: Option<String>,
    #[serde(rename = "Start Time")]
    pub start_time: Option<StartTime>,
    #[serde(rename = "Peak Hour", with = "yes_no_column")]
    pub is_peak_hour: bool,
    #[serde(rename = "Occupancy")]
    pub occupancy_percent: u8,
    #[serde(rename = "Occupancy Status")]
    pub occupancy_status: OccupancyStatus,
}

impl ProcessedRoute {
    /// Renders the derived columns as CSV cells in [`DERIVED_COLUMNS`] order.
    pub fn derived_cells(&self) -> Result<Vec<String>, serde_json::Error> {
        Ok(vec![
            self.city_route_type.to_string(),
            serde_json::to_string(&self.stop_sequence)?,
            self.stop_count.to_string(),
            self.route_length_class.to_string(),
            self.handover_point.clone().unwrap_or_default(),
            yes_no(self.is_peak_hour).to_string(),
            self.occupancy_percent.to_string(),
            self.occupancy_status.to_string(),
        ])
    }

    /// Parsed start time as an export cell, empty when unparseable.
    pub fn start_time_cell(&self) -> String {
        self.start_time.map(|t| t.to_string()).unwrap_or_default()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// One processed batch: the corpus threshold and a result per input row.
#[derive(Debug, Clone)]
pub struct Batch {
    pub threshold: f64,
    pub routes: Vec<ProcessedRoute>,
}

/// The stop sequence travels through CSV as a JSON array.
mod stop_sequence_column {
    use super::*;

    pub fn serialize<S: Serializer>(stops: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        let json = serde_json::to_string(stops).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&json)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

mod yes_no_column {
    use super::*;

    pub fn serialize<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(yes_no(*flag))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "Yes" => Ok(true),
            "No" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected Yes or No, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProcessedRoute {
        ProcessedRoute {
            route_number: "24 S".to_string(),
            city_route_type: CityRouteType::InCity,
            stop_sequence: vec!["Patia".to_string(), "Acharya Vihar".to_string()],
            stop_count: 2,
            route_length_class: RouteLengthClass::Short,
            handover_point: None,
            start_time: StartTime::parse("08:00"),
            is_peak_hour: true,
            occupancy_percent: 80,
            occupancy_status: OccupancyStatus::Overcrowded,
        }
    }

    #[test]
    fn test_labels_match_export_strings() {
        assert_eq!(CityRouteType::OutCity.to_string(), "Out-City");
        assert_eq!(RouteLengthClass::Long.to_string(), "Long Route");
        assert_eq!(OccupancyStatus::Underutilized.to_string(), "Underutilized");
    }

    #[test]
    fn test_derived_cells_order() {
        let cells = sample().derived_cells().unwrap();
        assert_eq!(cells.len(), DERIVED_COLUMNS.len());
        assert_eq!(
            cells,
            vec![
                "In-City",
                r#"["Patia","Acharya Vihar"]"#,
                "2",
                "Short Route",
                "",
                "Yes",
                "80",
                "Overcrowded",
            ]
        );
    }

    #[test]
    fn test_start_time_cell() {
        let mut route = sample();
        assert_eq!(route.start_time_cell(), "08:00:00");
        route.start_time = None;
        assert_eq!(route.start_time_cell(), "");
    }

    #[test]
    fn test_json_serialization_uses_column_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["Peak Hour"], "Yes");
        assert_eq!(json["Route Type"], "Short Route");
        assert_eq!(json["Stop Sequence"], r#"["Patia","Acharya Vihar"]"#);
        assert!(json["Handover Points"].is_null());
    }
}

//! Immutable run configuration injected into every pipeline run.
//!
//! Stored as a JSON object on disk; every field is optional and falls back
//! to the built-in defaults:
//! ```json
//! {
//!   "in_city_routes": ["12", "24 S"],
//!   "landmarks": ["Acharya Vihar"],
//!   "long_route_quantile": 0.65,
//!   "peak_windows": [{ "start_hour": 8, "end_hour": 10 }],
//!   "seed": 7
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::PipelineError;

const DEFAULT_IN_CITY_ROUTES: &[&str] = &[
    "9", "09 S", "11S", "12", "12S", "13", "13S", "16", "16S", "19", "19S", "20", "20 S", "21",
    "21 S", "23", "23 S", "24", "24 S", "24E", "25", "25 S", "26", "26 S", "27", "27 S", "28",
    "28 S", "29", "29 S", "29E", "30", "30 S", "31", "31S", "32", "32 S", "33", "33 S", "34",
    "34 S", "35", "35 S", "36", "36 S", "39", "39S", "40", "40S", "42", "42S",
];

const DEFAULT_OUT_CITY_ROUTES: &[&str] = &[
    "10", "10S", "17", "17S", "18", "18S", "22 A", "22 B", "22 S", "22B S", "37", "37 S", "38",
    "38S", "41", "41S", "43", "43S", "50", "50S", "51", "52", "52S", "53", "54", "54S", "70",
    "70S", "71", "71S", "80", "80 S", "81", "81 S", "81S", "82", "82 S", "83", "83 S",
];

const DEFAULT_LANDMARKS: &[&str] = &[
    "ACHARYA VIHAR",
    "AIRPORT GATE",
    "BARAMUNDA ISBT",
    "BHUBANESWAR RAILWAY STATION",
    "CUTTACK RAILWAY STATION",
    "JAYADEV VIHAR",
    "KHANDAGIRI SQUARE",
    "SISHUPALGARH",
    "NUAGAON",
    "LINGRAJ TEMPLE ROAD",
    "GOURI NAGAR",
    "STATE BANK SQUARE, CDA",
    "RAJ KISHORE MARG",
    "KIIT SQUARE",
    "NANDANKANAN ZOOLOGICAL PARK",
    "PHULNAKHARA JUNCTION",
    "RASULGARH SQUARE",
    "VANI VIHAR",
];

/// Default seed for the occupancy simulation.
pub const DEFAULT_SEED: u64 = 42;

/// A half-open hour-of-day interval `[start_hour, end_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl HourWindow {
    pub const fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Route numbers tagged In-City. Matched exactly, spaces and case included.
    pub in_city_routes: Vec<String>,
    /// Route numbers tagged Out-City. Matched exactly, spaces and case included.
    pub out_city_routes: Vec<String>,
    /// Candidate handover landmarks. Compared case-insensitively.
    pub landmarks: Vec<String>,
    /// Fraction of the stop-count distribution above which a route is Long.
    pub long_route_quantile: f64,
    /// Start of the midpoint window as a fraction of the stop count.
    pub window_start_fraction: f64,
    /// End (exclusive) of the midpoint window as a fraction of the stop count.
    pub window_end_fraction: f64,
    pub peak_windows: Vec<HourWindow>,
    pub overcrowded_percent: u8,
    pub underutilized_percent: u8,
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            in_city_routes: to_owned(DEFAULT_IN_CITY_ROUTES),
            out_city_routes: to_owned(DEFAULT_OUT_CITY_ROUTES),
            landmarks: to_owned(DEFAULT_LANDMARKS),
            long_route_quantile: 0.65,
            window_start_fraction: 0.4,
            window_end_fraction: 0.6,
            peak_windows: vec![HourWindow::new(8, 10), HourWindow::new(17, 18)],
            overcrowded_percent: 80,
            underutilized_percent: 30,
            seed: DEFAULT_SEED,
        }
    }
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl PipelineConfig {
    /// Loads a config from a JSON file at `path` and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "Pipeline config loaded");
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the validated defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, PipelineError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.long_route_quantile) {
            return Err(PipelineError::InvalidConfig(format!(
                "long_route_quantile must be within [0, 1], got {}",
                self.long_route_quantile
            )));
        }
        if !unit.contains(&self.window_start_fraction)
            || !unit.contains(&self.window_end_fraction)
            || self.window_start_fraction > self.window_end_fraction
        {
            return Err(PipelineError::InvalidConfig(format!(
                "midpoint window [{}, {}) must satisfy 0 <= start <= end <= 1",
                self.window_start_fraction, self.window_end_fraction
            )));
        }
        for w in &self.peak_windows {
            if w.start_hour >= w.end_hour || w.end_hour > 24 {
                return Err(PipelineError::InvalidConfig(format!(
                    "peak window [{}, {}) must satisfy start < end <= 24",
                    w.start_hour, w.end_hour
                )));
            }
        }
        if self.underutilized_percent >= self.overcrowded_percent {
            return Err(PipelineError::InvalidConfig(format!(
                "underutilized_percent ({}) must be below overcrowded_percent ({})",
                self.underutilized_percent, self.overcrowded_percent
            )));
        }

        let in_city: HashSet<&str> = self.in_city_routes.iter().map(String::as_str).collect();
        let overlap: Vec<&str> = self
            .out_city_routes
            .iter()
            .map(String::as_str)
            .filter(|r| in_city.contains(r))
            .collect();
        if !overlap.is_empty() {
            warn!(?overlap, "Routes listed as both in-city and out-city; in-city wins");
        }

        Ok(())
    }
}

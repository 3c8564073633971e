//! Peak-hour detection and occupancy bucketing.
//!
//! Occupancy percentages are SIMULATED: drawn from a seeded generator, one
//! per row, as a placeholder for real ridership counts. Consumers must not
//! treat them as measurements.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::analyzers::types::OccupancyStatus;
use crate::config::{HourWindow, PipelineConfig};
use crate::parser::StartTime;

/// Generator used for simulated occupancy, seeded once per run.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Draws a simulated occupancy percentage in `[0, 100)`.
pub fn simulate_occupancy<R: Rng>(rng: &mut R) -> u8 {
    rng.gen_range(0..100)
}

#[derive(Debug, Clone)]
pub struct OccupancyClassifier {
    peak_windows: Vec<HourWindow>,
    overcrowded_percent: u8,
    underutilized_percent: u8,
}

impl Default for OccupancyClassifier {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl OccupancyClassifier {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            peak_windows: config.peak_windows.clone(),
            overcrowded_percent: config.overcrowded_percent,
            underutilized_percent: config.underutilized_percent,
        }
    }

    /// `false` for an absent time; otherwise whether its hour falls in any
    /// peak window.
    pub fn is_peak_hour(&self, time: Option<&StartTime>) -> bool {
        time.is_some_and(|t| {
            let hour = t.hour();
            self.peak_windows.iter().any(|w| w.contains(hour))
        })
    }

    /// Both thresholds are inclusive to their named bucket.
    pub fn classify(&self, percent: u8) -> OccupancyStatus {
        match percent {
            p if p >= self.overcrowded_percent => OccupancyStatus::Overcrowded,
            p if p <= self.underutilized_percent => OccupancyStatus::Underutilized,
            _ => OccupancyStatus::Optimal,
        }
    }
}

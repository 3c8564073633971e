use serde::Serialize;

use crate::analyzers::types::{
    Batch, CityRouteType, OccupancyStatus, ProcessedRoute, RouteLengthClass,
};

/// Per-class counts for one processed batch.
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub total_routes: usize,
    /// Absent when summarizing a re-imported table.
    pub threshold: Option<f64>,

    // city route types
    pub in_city: usize,
    pub out_city: usize,
    pub unknown_city: usize,

    // length classes
    pub long_routes: usize,
    pub short_routes: usize,
    pub with_handover: usize,
    pub without_stops: usize,

    // occupancy (simulated)
    pub peak_hour: usize,
    pub overcrowded: usize,
    pub underutilized: usize,
    pub optimal: usize,
}

impl BatchSummary {
    pub fn from_batch(batch: &Batch) -> Self {
        BatchSummary {
            threshold: Some(batch.threshold),
            ..Self::from_routes(&batch.routes)
        }
    }

    /// Counts already-derived rows, e.g. read back from an exported table.
    pub fn from_routes(routes: &[ProcessedRoute]) -> Self {
        let mut s = BatchSummary {
            total_routes: routes.len(),
            ..Default::default()
        };

        for r in routes {
            s.count(r);
        }

        s
    }

    fn count(&mut self, r: &ProcessedRoute) {
        match r.city_route_type {
            CityRouteType::InCity => self.in_city += 1,
            CityRouteType::OutCity => self.out_city += 1,
            CityRouteType::Unknown => self.unknown_city += 1,
        }

        match r.route_length_class {
            RouteLengthClass::Long => self.long_routes += 1,
            RouteLengthClass::Short => self.short_routes += 1,
        }

        if r.handover_point.is_some() {
            self.with_handover += 1;
        }

        if r.stop_count == 0 {
            self.without_stops += 1;
        }

        if r.is_peak_hour {
            self.peak_hour += 1;
        }

        match r.occupancy_status {
            OccupancyStatus::Overcrowded => self.overcrowded += 1,
            OccupancyStatus::Underutilized => self.underutilized += 1,
            OccupancyStatus::Optimal => self.optimal += 1,
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Share of long routes for which a handover landmark was found.
    pub fn handover_pct(&self) -> f64 {
        Self::pct(self.with_handover, self.long_routes)
    }
}

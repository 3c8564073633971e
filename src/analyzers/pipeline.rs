use rand::Rng;
use tracing::{debug, info};

use crate::analyzers::handover::HandoverLocator;
use crate::analyzers::length::{classify_length, quantile};
use crate::analyzers::occupancy::{OccupancyClassifier, seeded_rng, simulate_occupancy};
use crate::analyzers::route_type::RouteTypeClassifier;
use crate::analyzers::types::{Batch, ProcessedRoute, RouteLengthClass};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::parser::{StartTime, parse_stops};
use crate::table::{RouteRecord, RouteTable};

/// Row values known before the corpus threshold exists.
struct RowFacts {
    route_number: String,
    stop_sequence: Vec<String>,
    start_time: Option<StartTime>,
}

/// Classifiers built once from a [`PipelineConfig`] and reused for every row.
#[derive(Debug, Clone)]
pub struct Pipeline {
    route_types: RouteTypeClassifier,
    handover: HandoverLocator,
    occupancy: OccupancyClassifier,
    long_route_quantile: f64,
    seed: u64,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            route_types: RouteTypeClassifier::from_config(config),
            handover: HandoverLocator::from_config(config),
            occupancy: OccupancyClassifier::from_config(config),
            long_route_quantile: config.long_route_quantile,
            seed: config.seed,
        }
    }

    /// Runs the batch with a generator seeded from the configured seed.
    pub fn run(&self, table: &RouteTable) -> Result<Batch, PipelineError> {
        let mut rng = seeded_rng(self.seed);
        self.run_with_rng(table, &mut rng)
    }

    /// Runs the batch, drawing one simulated occupancy per row from `rng` in
    /// row order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyBatch`] when the table has no rows.
    #[tracing::instrument(skip_all, fields(rows = table.len()))]
    pub fn run_with_rng<R: Rng>(
        &self,
        table: &RouteTable,
        rng: &mut R,
    ) -> Result<Batch, PipelineError> {
        if table.is_empty() {
            return Err(PipelineError::EmptyBatch);
        }

        let facts: Vec<RowFacts> = table
            .records
            .iter()
            .enumerate()
            .map(|(idx, record)| row_facts(idx, record))
            .collect();

        let counts: Vec<usize> = facts.iter().map(|f| f.stop_sequence.len()).collect();
        let threshold = quantile(&counts, self.long_route_quantile)?;
        info!(threshold, "Threshold for Long Route");

        let routes = facts
            .into_iter()
            .map(|f| self.tag(f, threshold, rng))
            .collect();

        Ok(Batch { threshold, routes })
    }

    fn tag<R: Rng>(&self, facts: RowFacts, threshold: f64, rng: &mut R) -> ProcessedRoute {
        let stop_count = facts.stop_sequence.len();
        let route_length_class = classify_length(stop_count, threshold);
        let handover_point = match route_length_class {
            RouteLengthClass::Long => self
                .handover
                .locate(&facts.stop_sequence)
                .map(str::to_string),
            RouteLengthClass::Short => None,
        };
        let occupancy_percent = simulate_occupancy(rng);

        ProcessedRoute {
            city_route_type: self.route_types.classify(&facts.route_number),
            route_number: facts.route_number,
            stop_sequence: facts.stop_sequence,
            stop_count,
            route_length_class,
            handover_point,
            start_time: facts.start_time,
            is_peak_hour: self.occupancy.is_peak_hour(facts.start_time.as_ref()),
            occupancy_percent,
            occupancy_status: self.occupancy.classify(occupancy_percent),
        }
    }
}

fn row_facts(idx: usize, record: &RouteRecord) -> RowFacts {
    let stop_sequence = parse_stops(record);
    if stop_sequence.is_empty() {
        debug!(row = idx, route = %record.route_number, "No intermediate stoppages");
    }

    let start_time = record.start_time.as_deref().and_then(|raw| {
        let parsed = StartTime::parse(raw);
        if parsed.is_none() {
            debug!(row = idx, raw, "Unparseable start time");
        }
        parsed
    });

    RowFacts {
        route_number: record.route_number.clone(),
        stop_sequence,
        start_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::CityRouteType;

    fn record(route: &str, mid: Option<&str>, time: Option<&str>) -> RouteRecord {
        RouteRecord {
            route_number: route.to_string(),
            starting_point: Some("Start".to_string()),
            intermediate_stoppages: mid.map(str::to_string),
            final_stoppage: Some("End".to_string()),
            start_time: time.map(str::to_string),
            cells: Vec::new(),
        }
    }

    fn table(records: Vec<RouteRecord>) -> RouteTable {
        RouteTable {
            headers: Vec::new(),
            records,
        }
    }

    #[test]
    fn test_empty_table_is_error() {
        let p = Pipeline::new(&PipelineConfig::default());
        assert!(matches!(
            p.run(&table(vec![])),
            Err(PipelineError::EmptyBatch)
        ));
    }

    #[test]
    fn test_single_row_is_short_without_handover() {
        let p = Pipeline::new(&PipelineConfig::default());
        let batch = p
            .run(&table(vec![record("24 S", Some("A - Acharya Vihar - B"), None)]))
            .unwrap();

        assert_eq!(batch.threshold, 5.0);
        let r = &batch.routes[0];
        assert_eq!(r.route_length_class, RouteLengthClass::Short);
        assert!(r.handover_point.is_none());
        assert_eq!(r.city_route_type, CityRouteType::InCity);
    }

    #[test]
    fn test_missing_stoppages_degrade_row() {
        let p = Pipeline::new(&PipelineConfig::default());
        let batch = p
            .run(&table(vec![
                record("12", None, Some("garbage")),
                record("13", Some("A - B"), Some("08:30")),
            ]))
            .unwrap();

        let broken = &batch.routes[0];
        assert!(broken.stop_sequence.is_empty());
        assert_eq!(broken.stop_count, 0);
        assert!(broken.start_time.is_none());
        assert!(!broken.is_peak_hour);

        let ok = &batch.routes[1];
        assert_eq!(ok.stop_count, 4);
        assert!(ok.is_peak_hour);
        assert_eq!(ok.route_length_class, RouteLengthClass::Long);
    }

    #[test]
    fn test_short_routes_never_get_handover() {
        let p = Pipeline::new(&PipelineConfig::default());
        // Both rows have 5 stops with a landmark at index 2, threshold is 5.
        let batch = p
            .run(&table(vec![
                record("12", Some("A - Kiit Square - B"), None),
                record("13", Some("A - Kiit Square - B"), None),
            ]))
            .unwrap();

        for r in &batch.routes {
            assert_eq!(r.route_length_class, RouteLengthClass::Short);
            assert!(r.handover_point.is_none());
        }
    }

    #[test]
    fn test_long_route_gets_handover() {
        let p = Pipeline::new(&PipelineConfig::default());
        let batch = p
            .run(&table(vec![
                record("12", Some("A"), None),
                record("13", Some("A - B - Kiit Square - C"), None),
            ]))
            .unwrap();

        // counts [3, 6]; rank 0.65 -> 3 + 0.65 * 3
        assert!((batch.threshold - 4.95).abs() < 1e-9);
        let long = &batch.routes[1];
        assert_eq!(long.route_length_class, RouteLengthClass::Long);
        // n = 6 -> window [2, 3) -> "B"; no landmark there
        assert!(long.handover_point.is_none());
    }

    #[test]
    fn test_out_of_range_quantile_is_error() {
        let config = PipelineConfig {
            long_route_quantile: 1.5,
            ..Default::default()
        };
        let result = Pipeline::new(&config).run(&table(vec![
            record("12", Some("A"), None),
            record("13", Some("A - B"), None),
        ]));
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_final_stoppage_still_counts() {
        let mut r = record("12", Some("B - C"), None);
        r.starting_point = Some("A".to_string());
        r.final_stoppage = None;
        let batch = Pipeline::new(&PipelineConfig::default())
            .run(&table(vec![r]))
            .unwrap();
        assert_eq!(batch.routes[0].stop_count, 4);
    }

    #[test]
    fn test_same_seed_same_occupancy() {
        let rows = table(vec![
            record("12", Some("A"), None),
            record("13", Some("A - B"), None),
            record("14", Some("A - B - C"), None),
        ]);
        let config = PipelineConfig::default().with_seed(7);
        let a = Pipeline::new(&config).run(&rows).unwrap();
        let b = Pipeline::new(&config).run(&rows).unwrap();

        assert_eq!(a.routes, b.routes);
    }

    #[test]
    fn test_injected_rng_is_used() {
        let rows = table(vec![record("12", Some("A"), None)]);
        let p = Pipeline::new(&PipelineConfig::default());

        let mut rng = seeded_rng(123);
        let expected = simulate_occupancy(&mut rng);

        let mut rng = seeded_rng(123);
        let batch = p.run_with_rng(&rows, &mut rng).unwrap();
        assert_eq!(batch.routes[0].occupancy_percent, expected);
    }
}

//! CSV ingestion for route tables.
//!
//! Every original column is carried through untouched so the export can
//! reproduce the uploaded table with derived columns appended.

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::PipelineError;

pub const ROUTE_NO: &str = "Route No.";
pub const STARTING_POINT: &str = "Starting Point";
pub const INTERMEDIATE_STOPPAGES: &str = "Intermediate Stoppages";
pub const FINAL_STOPPAGE: &str = "Final Stoppage";
pub const START_TIME: &str = "Start Time";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    ROUTE_NO,
    STARTING_POINT,
    INTERMEDIATE_STOPPAGES,
    FINAL_STOPPAGE,
    START_TIME,
];

/// One input row. Empty or missing cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteRecord {
    pub route_number: String,
    pub starting_point: Option<String>,
    pub intermediate_stoppages: Option<String>,
    pub final_stoppage: Option<String>,
    pub start_time: Option<String>,
    /// Every cell of the row in header order, padded to the header width.
    pub cells: Vec<String>,
}

/// An uploaded table: its header row and one record per data row.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    pub headers: Vec<String>,
    pub records: Vec<RouteRecord>,
}

/// Positions of the required columns within the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    route_no: usize,
    starting_point: usize,
    intermediate: usize,
    final_stoppage: usize,
    start_time: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, PipelineError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| find(**c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns { missing });
        }

        // All present, checked above.
        let at = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            route_no: at(ROUTE_NO),
            starting_point: at(STARTING_POINT),
            intermediate: at(INTERMEDIATE_STOPPAGES),
            final_stoppage: at(FINAL_STOPPAGE),
            start_time: at(START_TIME),
        })
    }
}

fn cell(row: &StringRecord, idx: usize) -> Option<String> {
    row.get(idx).filter(|v| !v.is_empty()).map(str::to_string)
}

impl RouteTable {
    /// Reads a table from any CSV source.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingColumns`] when a required header is
    /// absent, or a CSV error when the source cannot be decoded at all.
    /// Short or sparse rows are accepted.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PipelineError> {
        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let cols = ColumnIndex::resolve(&headers)?;

        let mut records = Vec::new();
        for (row_idx, result) in rdr.records().enumerate() {
            let row = result?;
            if row.len() != headers.len() {
                debug!(
                    row = row_idx,
                    cells = row.len(),
                    expected = headers.len(),
                    "Row width differs from header"
                );
            }

            let mut cells: Vec<String> = row.iter().map(str::to_string).collect();
            cells.resize(headers.len(), String::new());

            records.push(RouteRecord {
                route_number: row.get(cols.route_no).unwrap_or_default().to_string(),
                starting_point: cell(&row, cols.starting_point),
                intermediate_stoppages: cell(&row, cols.intermediate),
                final_stoppage: cell(&row, cols.final_stoppage),
                start_time: cell(&row, cols.start_time),
                cells,
            });
        }

        Ok(Self { headers, records })
    }

    /// Reads a table from a CSV file on disk.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let file = File::open(path.as_ref())?;
        let table = Self::from_reader(file)?;
        info!(rows = table.records.len(), "Route table loaded");
        Ok(table)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Position of `name` within the header row.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

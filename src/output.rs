//! Output formatting and persistence for processed route tables.
//!
//! Supports pretty-printing, JSON summaries, CSV export (plain or gzip)
//! and re-import of an exported table.

use csv::WriterBuilder;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

use crate::analyzers::types::{Batch, DERIVED_COLUMNS, ProcessedRoute};
use crate::error::PipelineError;
use crate::stats::BatchSummary;
use crate::table::{RouteTable, START_TIME};

/// Logs a batch summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &BatchSummary) {
    info!("{:#?}", summary);
}

/// Logs a batch summary as pretty-printed JSON.
pub fn print_json(summary: &BatchSummary) -> Result<(), PipelineError> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Writes the augmented table: original columns in their original order
/// followed by the derived columns. No index column is written.
///
/// Input columns that share a name with a derived column are dropped so a
/// re-processed export does not duplicate them. The `Start Time` cell is
/// replaced by its parsed rendering.
pub fn write_processed<W: Write>(
    writer: W,
    table: &RouteTable,
    batch: &Batch,
) -> Result<(), PipelineError> {
    let kept: Vec<usize> = (0..table.headers.len())
        .filter(|&i| !DERIVED_COLUMNS.contains(&table.headers[i].as_str()))
        .collect();
    let start_time_col = table.column(START_TIME);

    let mut wtr = WriterBuilder::new().from_writer(writer);

    let header = kept
        .iter()
        .map(|&i| table.headers[i].as_str())
        .chain(DERIVED_COLUMNS);
    wtr.write_record(header)?;

    for (record, route) in table.records.iter().zip(&batch.routes) {
        let mut row: Vec<String> = kept
            .iter()
            .map(|&i| {
                if Some(i) == start_time_col {
                    route.start_time_cell()
                } else {
                    record.cells.get(i).cloned().unwrap_or_default()
                }
            })
            .collect();
        row.extend(route.derived_cells()?);
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the augmented table to `path`, gzip-compressed when `gzip` is set.
#[tracing::instrument(skip(path, table, batch), fields(path = %path.as_ref().display()))]
pub fn export_csv(
    path: impl AsRef<Path>,
    table: &RouteTable,
    batch: &Batch,
    gzip: bool,
) -> Result<(), PipelineError> {
    let file = File::create(path.as_ref())?;

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_processed(&mut encoder, table, batch)?;
        encoder.finish()?;
    } else {
        write_processed(file, table, batch)?;
    }

    info!(rows = batch.routes.len(), "Processed table exported");
    Ok(())
}

/// Reads the derived columns of an exported table back as data.
///
/// Values are taken as written; nothing is recomputed.
pub fn read_processed<R: Read>(reader: R) -> Result<Vec<ProcessedRoute>, PipelineError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let route: ProcessedRoute = result?;
        rows.push(route);
    }

    Ok(rows)
}

/// Reads an exported file, transparently decompressing `.gz` paths.
pub fn read_processed_path(path: impl AsRef<Path>) -> Result<Vec<ProcessedRoute>, PipelineError> {
    let path = path.as_ref();
    let file = File::open(path)?;

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        read_processed(GzDecoder::new(file))
    } else {
        read_processed(file)
    }
}

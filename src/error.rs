//! Error taxonomy for a pipeline run.
//!
//! Malformed rows are never errors: they degrade to empty/absent derived
//! values inside the batch. Only conditions that make the whole batch
//! meaningless surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input table lacks one or more columns the pipeline reads.
    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// The input table has a header but no data rows, so no threshold exists.
    #[error("input contains no route rows")]
    EmptyBatch,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

//! CLI entry point for the fleet handover analysis tool.
//!
//! Provides subcommands for processing a route table into an augmented CSV,
//! and for inspecting the fleet, handover and summary views of a batch.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fleet_handover::analyzers::Pipeline;
use fleet_handover::analyzers::types::Batch;
use fleet_handover::config::PipelineConfig;
use fleet_handover::output::{export_csv, print_json, print_pretty, read_processed_path};
use fleet_handover::stats::BatchSummary;
use fleet_handover::table::RouteTable;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fleet_handover")]
#[command(about = "Fleet management and handover analysis for bus routes", long_about = None)]
struct Cli {
    /// JSON config overriding route lists, landmarks and thresholds
    #[arg(long, global = true, env = "FLEET_CONFIG")]
    config: Option<String>,

    /// Seed for the simulated occupancy values
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a route CSV and export the augmented table
    Process {
        /// Path to the route CSV
        #[arg(value_name = "INPUT")]
        input: String,

        /// CSV file to write the processed table to
        #[arg(short, long, default_value = "processed_data.csv")]
        output: String,

        /// Gzip compress the exported CSV (appends .gz)
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Show the in-city / out-city classification of every route
    Fleet {
        #[arg(value_name = "INPUT")]
        input: String,
    },
    /// Show stop counts, length classes and handover points
    Handover {
        #[arg(value_name = "INPUT")]
        input: String,
    },
    /// Summarize a processed batch
    Summary {
        #[arg(value_name = "INPUT")]
        input: String,

        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summarize a previously exported table without recomputing it
    Inspect {
        /// Exported CSV, optionally gzip compressed (.gz)
        #[arg(value_name = "PROCESSED")]
        input: String,

        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/fleet_handover.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fleet_handover.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = PipelineConfig::load_or_default(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    let pipeline = Pipeline::new(&config);

    match cli.command {
        Commands::Process {
            input,
            output,
            gzip,
        } => {
            let (table, batch) = load_and_run(&pipeline, &input)?;
            let output = if gzip {
                format!("{}.gz", output)
            } else {
                output
            };
            export_csv(&output, &table, &batch, gzip)?;
            info!(output = %output, seed = config.seed, "Occupancy values are simulated");
        }
        Commands::Fleet { input } => {
            let (_, batch) = load_and_run(&pipeline, &input)?;
            for r in &batch.routes {
                info!(
                    route = %r.route_number,
                    city_route_type = %r.city_route_type,
                    "Fleet"
                );
            }
        }
        Commands::Handover { input } => {
            let (_, batch) = load_and_run(&pipeline, &input)?;
            info!(threshold = batch.threshold, "Threshold for Long Route");
            for r in &batch.routes {
                info!(
                    route = %r.route_number,
                    stops = r.stop_count,
                    route_type = %r.route_length_class,
                    handover = r.handover_point.as_deref().unwrap_or(""),
                    "Handover"
                );
            }
        }
        Commands::Summary { input, json } => {
            let (_, batch) = load_and_run(&pipeline, &input)?;
            report_summary(&BatchSummary::from_batch(&batch), json)?;
        }
        Commands::Inspect { input, json } => {
            let routes = read_processed_path(&input)?;
            info!(input = %input, rows = routes.len(), "Processed table re-imported");
            report_summary(&BatchSummary::from_routes(&routes), json)?;
        }
    }

    Ok(())
}

/// Logs a summary in full, pretty or as JSON.
fn report_summary(summary: &BatchSummary, json: bool) -> Result<()> {
    if json {
        print_json(summary)?;
    } else {
        print_pretty(summary);
        info!(
            total = summary.total_routes,
            long = summary.long_routes,
            with_handover = summary.with_handover,
            handover_pct = summary.handover_pct(),
            "Batch summary"
        );
    }
    Ok(())
}

/// Loads a route table and runs the pipeline over it.
#[tracing::instrument(skip(pipeline))]
fn load_and_run(pipeline: &Pipeline, input: &str) -> Result<(RouteTable, Batch)> {
    let table = RouteTable::from_path(input)?;
    let batch = pipeline.run(&table)?;
    Ok((table, batch))
}

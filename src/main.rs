//! CLI entry point for the Rental QoL Rater tool.
//!
//! Provides subcommands for fetching air pollution observations per
//! rental cluster, fetching rental listings, converting observations
//! into AQI records, and scoring listing feature batches.

mod infra;
mod services;

use crate::infra::openweather::OpenWeatherClient;
use crate::infra::rentcast::RentCastClient;
use crate::services::air_api::{AirPollutionApi, ClusterCentroid};
use anyhow::Result;
use clap::{Parser, Subcommand};
use rental_rater::aqi::{AqiRecord, compute_aqi};
use rental_rater::output::{append_record, print_json, read_rows, write_json};
use rental_rater::parser::{Observation, parse_observations};
use rental_rater::scoring::{ListingFeatures, ScoreReport, compute_qol_scores};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::Instrument;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "rental_rater")]
#[command(about = "A tool to rate rental listings by air quality and quality of life", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch current air pollution observations for cluster centroids
    FetchAir {
        /// CSV of cluster centroids (cluster_id,lat,lon)
        #[arg(short, long)]
        input: String,

        /// JSON file to write the raw observation batch to
        #[arg(short, long, default_value = "observations.json")]
        output: String,

        /// Maximum number of concurrent provider requests
        #[arg(short, long, default_value_t = 5)]
        concurrency: usize,
    },
    /// Fetch active rental listings from the listings provider
    FetchListings {
        /// JSON file to write the raw listing records to
        #[arg(short, long, default_value = "listings.json")]
        output: String,

        /// State filter passed to the provider
        #[arg(short, long, default_value = "DC")]
        state: String,

        /// Records per page
        #[arg(short, long, default_value_t = 500)]
        page_size: usize,
    },
    /// Convert fetched observations into AQI records
    Aqi {
        /// Observation batch JSON produced by fetch-air
        #[arg(short, long)]
        input: String,

        /// CSV file to append AQI records to
        #[arg(short, long, default_value = "aqi.csv")]
        output: String,
    },
    /// Compute composite Quality-of-Life scores for a listing batch
    Score {
        /// Dense feature table CSV produced by the aggregation job
        #[arg(short, long)]
        input: String,

        /// CSV file to append score rows to
        #[arg(short, long, default_value = "scores.csv")]
        output: String,

        /// Optional JSON report with scores and derived weights
        #[arg(short, long)]
        report: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/rental_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("rental_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::FetchAir { input, output, concurrency } => {
            fetch_air(&input, &output, concurrency).await?;
        }
        Commands::FetchListings { output, state, page_size } => {
            fetch_listings(&output, state, page_size).await?;
        }
        Commands::Aqi { input, output } => {
            convert_observations(&input, &output)?;
        }
        Commands::Score { input, output, report } => {
            score_listings(&input, &output, report.as_deref())?;
        }
    }

    Ok(())
}

/// Fetches one air pollution observation per cluster centroid, with
/// bounded concurrency. Individual fetch failures are logged and skipped
/// so one bad coordinate never aborts the sweep.
#[tracing::instrument]
async fn fetch_air(input: &str, output: &str, concurrency: usize) -> Result<()> {
    let centroids: Vec<ClusterCentroid> = read_rows(input)?;
    if centroids.is_empty() {
        warn!("No centroids found in input");
        return Ok(());
    }
    info!(centroid_count = centroids.len(), "Centroids loaded");

    let client = Arc::new(OpenWeatherClient::from_env()?);
    let semaphore = Arc::new(tokio::sync::Semaphore::new(concurrency));

    let mut tasks = vec![];

    for centroid in centroids {
        let sem = semaphore.clone();
        let client = client.clone();

        let span = tracing::info_span!("fetch_observation", cluster_id = centroid.cluster_id);

        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire().await.unwrap();

                match client.current_pollution(centroid.lat, centroid.lon).await {
                    Ok(sample) => {
                        info!("Observation fetched");
                        Some(Observation {
                            cluster_id: centroid.cluster_id,
                            components: sample.components,
                        })
                    }
                    Err(e) => {
                        error!(
                            error = %e,
                            lat = centroid.lat,
                            lon = centroid.lon,
                            "Observation fetch failed"
                        );
                        None
                    }
                }
            }
            .instrument(span),
        );

        tasks.push(task);
    }

    let mut observations = Vec::new();
    for task in tasks {
        if let Ok(Some(observation)) = task.await {
            observations.push(observation);
        }
    }

    write_json(output, &observations)?;
    info!(observation_count = observations.len(), output, "Observation batch written");
    Ok(())
}

/// Pages through the listings provider and saves the raw records for the
/// downstream aggregation job.
#[tracing::instrument]
async fn fetch_listings(output: &str, state: String, page_size: usize) -> Result<()> {
    let client = RentCastClient::from_env(state)?;

    let records = client.fetch_all(page_size).await?;
    write_json(output, &records)?;

    info!(record_count = records.len(), output, "Listing batch written");
    Ok(())
}

/// Runs the AQI engine over a fetched observation batch and appends one
/// record per observation to the output CSV. Observations that fail
/// validation are logged and skipped.
#[tracing::instrument]
fn convert_observations(input: &str, output: &str) -> Result<()> {
    let bytes = std::fs::read(input)?;
    let observations = parse_observations(&bytes)?;
    info!(observation_count = observations.len(), "Observations loaded");

    let mut written = 0usize;
    for observation in &observations {
        match compute_aqi(&observation.readings()) {
            Ok(result) => {
                if result.exceeds_scale {
                    warn!(
                        cluster_id = observation.cluster_id,
                        "Concentration above the breakpoint scale, index clamped"
                    );
                }
                let record = AqiRecord::from_result(observation.cluster_id, &result);
                append_record(output, &record)?;
                written += 1;
            }
            Err(e) => {
                error!(
                    cluster_id = observation.cluster_id,
                    error = %e,
                    "Skipping invalid observation"
                );
            }
        }
    }

    info!(written, total = observations.len(), output, "AQI records written");
    Ok(())
}

/// Loads the dense feature table, runs the scoring engine over the whole
/// batch, and writes score rows plus the optional JSON report.
#[tracing::instrument]
fn score_listings(input: &str, output: &str, report: Option<&str>) -> Result<()> {
    let rows: Vec<ListingFeatures> = read_rows(input)?;
    info!(listing_count = rows.len(), "Feature table loaded");

    let batch = compute_qol_scores(&rows)?;
    print_json(&batch.weights)?;

    for score in &batch.scores {
        append_record(output, score)?;
    }

    if let Some(report_path) = report {
        write_json(report_path, &ScoreReport::from_batch(&batch))?;
        info!(report = report_path, "Score report written");
    }

    info!(score_count = batch.scores.len(), output, "Score rows written");
    Ok(())
}

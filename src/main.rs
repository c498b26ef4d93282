//! CLI entry point for the flight manifest analyzer.
//!
//! Provides subcommands for summarizing manifest exports, exporting the
//! aggregated flight legs or the filtered passenger rows as CSV, and
//! listing the selectable filter values.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use flight_manifest_analyzer::{
    fetch::{BasicClient, fetch_bytes},
    filter::{FilterCriteria, FilterField},
    output::{self, SummaryReport},
    parser::parse_rows,
    session::Session,
};
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
#[command(name = "flight_manifest_analyzer")]
#[command(about = "A tool to analyze official flight manifest exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DatasetArgs {
    /// Manifest CSV files or URLs to load, in order
    #[arg(value_name = "FILE_OR_URL")]
    files: Vec<String>,

    /// JSON manifest (ordered array of file paths/URLs), loaded after FILE_OR_URL entries
    #[arg(short, long)]
    manifest: Option<String>,
}

#[derive(Args)]
struct FilterArgs {
    /// Keep only rows whose date ends with this year
    #[arg(long)]
    year: Option<String>,

    /// Keep only rows departing from this origin
    #[arg(long)]
    origin: Option<String>,

    /// Keep only rows arriving at this destination
    #[arg(long)]
    destination: Option<String>,

    /// Keep only rows requested by this agency
    #[arg(long)]
    agency: Option<String>,

    /// Keep only rows whose status contains this text (case-insensitive)
    #[arg(long)]
    status: Option<String>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            year: args.year,
            origin: args.origin,
            destination: args.destination,
            agency: args.agency,
            status: args.status,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print summary statistics for the (optionally filtered) dataset
    Summary {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Number of destinations to include in the ranking
        #[arg(short, long, default_value_t = 12)]
        top: usize,
    },
    /// Write the aggregated flight legs to a CSV file
    Flights {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "flights.csv")]
        output: String,
    },
    /// Write the filtered passenger rows to a CSV file
    Export {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "records.csv")]
        output: String,
    },
    /// List the selectable values for a filter field
    Options {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Field to enumerate: year, origin, destination, agency or status
        #[arg(short, long)]
        field: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/flight_manifest_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("flight_manifest_analyzer.log"));

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
        Commands::Summary {
            dataset,
            filters,
            top,
        } => {
            let session = load_session(&dataset).await?;
            let view = session.view(&filters.into());

            let report = SummaryReport::new(&view, top);
            output::print_json(&report)?;
        }
        Commands::Flights {
            dataset,
            filters,
            output: output_path,
        } => {
            let session = load_session(&dataset).await?;
            let view = session.view(&filters.into());

            output::write_flights_csv(&output_path, &view.flights)?;
            info!(
                path = %output_path,
                flights = view.flights.len(),
                "Flights CSV written"
            );
        }
        Commands::Export {
            dataset,
            filters,
            output: output_path,
        } => {
            let session = load_session(&dataset).await?;
            let view = session.view(&filters.into());

            output::write_records_csv(&output_path, &view.records)?;
            info!(
                path = %output_path,
                records = view.records.len(),
                "Passenger rows CSV written"
            );
        }
        Commands::Options { dataset, field } => {
            let field: FilterField = field.parse()?;
            let session = load_session(&dataset).await?;

            let values = session.options(field);
            for value in &values {
                info!(value = %value, "Option");
            }
            info!(field = ?field, count = values.len(), "Options listed");
        }
    }

    Ok(())
}

/// Loads source bytes from a local file path or fetches them over HTTP.
#[tracing::instrument(fields(source = %url))]
async fn fetcher(url: &str) -> Result<Vec<u8>> {
    let bytes = if url.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, url).await?
    } else {
        std::fs::read(url).with_context(|| format!("cannot read file '{url}'"))?
    };
    Ok(bytes)
}

/// Resolves the ordered source list: explicit FILE_OR_URL arguments first,
/// then the entries of the JSON manifest, in manifest order.
async fn resolve_sources(dataset: &DatasetArgs) -> Result<Vec<String>> {
    let mut sources = dataset.files.clone();

    if let Some(manifest) = &dataset.manifest {
        let bytes = fetcher(manifest)
            .await
            .with_context(|| format!("failed to load manifest '{manifest}'"))?;
        let listed: Vec<String> = serde_json::from_slice(&bytes)
            .with_context(|| format!("manifest '{manifest}' is not a JSON array of file names"))?;

        info!(manifest = %manifest, files = listed.len(), "Manifest loaded");
        sources.extend(listed);
    }

    Ok(sources)
}

/// Loads every source in order and normalizes the concatenation into one
/// session. Any unreadable source fails the whole load, so a partially
/// populated dataset is never presented.
async fn load_session(dataset: &DatasetArgs) -> Result<Session> {
    let sources = resolve_sources(dataset).await?;
    if sources.is_empty() {
        bail!("no input files given; pass FILE_OR_URL arguments or --manifest");
    }

    let mut batches = Vec::new();
    for source in &sources {
        let bytes = fetcher(source)
            .await
            .with_context(|| format!("failed to load '{source}'"))?;
        let rows = parse_rows(&bytes).with_context(|| format!("failed to parse '{source}'"))?;

        info!(source = %source, rows = rows.len(), "Source file loaded");
        batches.push(rows);
    }

    let session = Session::from_batches(batches);
    info!(
        records = session.len(),
        files = sources.len(),
        "Dataset ready"
    );

    Ok(session)
}

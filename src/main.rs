//! CLI entry point for the bike-share traffic tool.
//!
//! Provides subcommands for computing per-station traffic tables, emitting
//! the marker payload for the map overlay, and listing the station catalog.

use anyhow::Result;
use bikeshare_traffic::{
    catalog::{Station, parse_stations},
    fetch::{BasicClient, load_source},
    markers::build_document,
    output::{markers_json, print_pretty, write_markers_json, write_traffic_csv},
    timeofday::{TimeFilter, filter_trips},
    traffic::compute_traffic,
    trips::{Trip, read_trips},
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Station catalog and trip log published for the Boston Bluebikes system.
const DEFAULT_STATIONS_URL: &str = "https://dsc106.com/labs/lab07/data/bluebikes-stations.json";
const DEFAULT_TRIPS_URL: &str = "https://dsc106.com/labs/lab07/data/bluebikes-traffic-2024-03.csv";

#[derive(Parser)]
#[command(name = "bikeshare_traffic")]
#[command(about = "A tool to analyze bike-share station traffic", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-station arrival/departure counts and write them as CSV
    Traffic {
        /// Station catalog: path to a JSON file or URL to fetch
        #[arg(long, default_value = DEFAULT_STATIONS_URL)]
        stations: String,

        /// Trip log: path to a CSV file or URL to fetch
        #[arg(long, default_value = DEFAULT_TRIPS_URL)]
        trips: String,

        /// Time-of-day filter: 'any', a minute in [-1, 1439], or HH:MM
        #[arg(short, long, default_value = "any")]
        at: TimeFilter,

        /// CSV file to write the traffic table to
        #[arg(short, long, default_value = "traffic.csv")]
        output: String,
    },
    /// Emit the marker payload consumed by the map overlay
    Markers {
        /// Station catalog: path to a JSON file or URL to fetch
        #[arg(long, default_value = DEFAULT_STATIONS_URL)]
        stations: String,

        /// Trip log: path to a CSV file or URL to fetch
        #[arg(long, default_value = DEFAULT_TRIPS_URL)]
        trips: String,

        /// Time-of-day filter: 'any', a minute in [-1, 1439], or HH:MM
        #[arg(short, long, default_value = "any")]
        at: TimeFilter,

        /// JSON file to write; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Pretty-print the JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// List the station catalog
    Stations {
        /// Station catalog: path to a JSON file or URL to fetch
        #[arg(long, default_value = DEFAULT_STATIONS_URL)]
        stations: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_traffic.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_traffic.log"));

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

    if let Err(error) = run(cli).await {
        error!(error = %error, "Setup aborted");
        return Err(error);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Traffic {
            stations,
            trips,
            at,
            output,
        } => {
            let (stations, trips) = load_data(&stations, &trips).await?;

            let active = filter_trips(&trips, at);
            let traffic = compute_traffic(&stations, &active);
            print_pretty(&traffic);

            write_traffic_csv(&output, &traffic)?;
            info!(
                output = %output,
                stations = traffic.len(),
                active_trips = active.len(),
                time = %at.label(),
                "Traffic table written"
            );
        }
        Commands::Markers {
            stations,
            trips,
            at,
            output,
            pretty,
        } => {
            let (stations, trips) = load_data(&stations, &trips).await?;

            let active = filter_trips(&trips, at);
            let traffic = compute_traffic(&stations, &active);

            let doc = build_document(at, traffic, trips.len(), active.len());
            match output {
                Some(path) => {
                    write_markers_json(&path, &doc, pretty)?;
                    info!(path = %path, markers = doc.markers.len(), "Marker payload written");
                }
                None => println!("{}", markers_json(&doc, pretty)?),
            }
        }
        Commands::Stations { stations } => {
            let client = BasicClient::new();
            let bytes = load_source(&client, &stations).await?;
            let stations = parse_stations(&bytes)?;

            for station in &stations {
                info!(
                    short_name = %station.short_name,
                    name = %station.name,
                    lat = station.lat,
                    lon = station.lon,
                    "Station"
                );
            }

            info!(total = stations.len(), "Station catalog summary");
        }
    }

    Ok(())
}

/// Retrieves and parses both data sources, suspending until each resolves.
#[tracing::instrument(fields(stations = %stations_source, trips = %trips_source))]
async fn load_data(stations_source: &str, trips_source: &str) -> Result<(Vec<Station>, Vec<Trip>)> {
    let client = BasicClient::new();

    let (station_bytes, trip_bytes) = tokio::try_join!(
        load_source(&client, stations_source),
        load_source(&client, trips_source),
    )?;

    let stations = parse_stations(&station_bytes)?;
    let trips = read_trips(trip_bytes.as_slice())?;

    info!(
        stations = stations.len(),
        trips = trips.len(),
        "Data sources loaded"
    );

    Ok((stations, trips))
}

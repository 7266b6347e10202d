//! OJP CLI
//!
//! Command-line interface for place searches, trip planning and departure
//! boards against an OJP 2.0 endpoint.

#![allow(clippy::print_stdout)]

mod output;
mod settings;

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use domain::GeoLocation;
use integration_ojp::model::{
    NumberOfResults, PlaceContext, PlaceRefChoice, PlaceTypeRestriction, StopEventParams,
    StopEventType, TripInfoParams, TripParams,
};
use integration_ojp::{CancelToken, OjpClient, PaginatedTripLoader, TripQuery, TripTime};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// OJP CLI
#[derive(Parser)]
#[command(name = "ojp-cli")]
#[command(author, version, about = "Open Journey Planner 2.0 client", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Configuration file (default: ./ojp.toml if present)
    #[arg(short, long, env = "OJP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Search places by name
    Places {
        /// Name or part of it
        name: String,

        /// Place types to include (stop, address, poi, location, topographicPlace)
        #[arg(short = 't', long = "type", default_value = "stop")]
        types: Vec<PlaceTypeRestriction>,

        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Search places around a coordinate, nearest first
    Nearby {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Search radius in meters
        #[arg(short, long, default_value = "1000")]
        radius: f64,

        /// Place types to include
        #[arg(short = 't', long = "type", default_value = "stop")]
        types: Vec<PlaceTypeRestriction>,

        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Plan trips between two stop places
    ///
    /// Example: ojp-cli trips 8507000 8503000 --at 2024-05-13T08:00:00Z --next 1
    Trips {
        /// Origin stop place reference
        from: String,

        /// Destination stop place reference
        to: String,

        /// Departure time (RFC 3339, default: now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,

        /// Treat --at as the latest arrival time
        #[arg(long)]
        arrive: bool,

        /// Number of trips per page (default: configured page size)
        #[arg(short, long)]
        count: Option<u32>,

        /// Additional pages of earlier trips
        #[arg(long, default_value = "0")]
        previous: u32,

        /// Additional pages of later trips
        #[arg(long, default_value = "0")]
        next: u32,
    },

    /// Show departures or arrivals at a stop
    StopEvents {
        /// Stop place reference
        stop: String,

        /// Show arrivals instead of departures
        #[arg(long)]
        arrivals: bool,

        /// Board time (RFC 3339, default: now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,

        /// Maximum number of events
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Show all calls of one vehicle journey
    TripInfo {
        /// Journey reference
        journey_ref: String,

        /// Operating day (YYYY-MM-DD)
        operating_day: String,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(verbose)));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    let config = settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    info!(endpoint = %config.endpoint_url, "Configuration loaded");
    let page_size = config.page_size;
    let client = OjpClient::new(config)?;

    match cli.command {
        Commands::Places { name, types, limit } => {
            let results = client.places_by_name(&name, &types, limit).await?;
            print!("{}", output::places(&results, None));
        },

        Commands::Nearby {
            lat,
            lon,
            radius,
            types,
            limit,
        } => {
            let center = GeoLocation::new(lat, lon)?;
            let results = client.places_near(center, radius, &types, limit).await?;
            print!("{}", output::places(&results, Some(&center)));
        },

        Commands::Trips {
            from,
            to,
            at,
            arrive,
            count,
            previous,
            next,
        } => {
            let at = at.unwrap_or_else(Utc::now);
            let time = if arrive {
                TripTime::Arrival(at)
            } else {
                TripTime::Departure(at)
            };
            let policy = NumberOfResults::After(count.unwrap_or(page_size));
            let query = TripQuery::departing(
                PlaceRefChoice::stop_place(from.as_str(), from.as_str()),
                PlaceRefChoice::stop_place(to.as_str(), to.as_str()),
                at,
                TripParams::new(policy),
            )
            .at(time);

            let loader = PaginatedTripLoader::new(client);
            let token = CancelToken::new();
            let cancel_on_ctrl_c = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel_on_ctrl_c.cancel();
                }
            });

            let first = loader.load_trips(query, policy, token.signal()).await?;
            print!("{}", output::trips(&first));
            for _ in 0..previous {
                let page = loader.load_previous(token.signal()).await?;
                println!("--- earlier");
                print!("{}", output::trips(&page));
            }
            for _ in 0..next {
                let page = loader.load_next(token.signal()).await?;
                println!("--- later");
                print!("{}", output::trips(&page));
            }
            info!(trips = loader.seen_count().await, "Trip search finished");
        },

        Commands::StopEvents {
            stop,
            arrivals,
            at,
            limit,
        } => {
            let event_type = if arrivals {
                StopEventType::Arrival
            } else {
                StopEventType::Departure
            };
            let location = PlaceContext::at(
                PlaceRefChoice::stop_place(stop.as_str(), stop.as_str()),
                at.unwrap_or_else(Utc::now),
            );
            let delivery = client
                .stop_events(location, Some(StopEventParams::board(event_type, limit)))
                .await?;
            print!("{}", output::stop_events(&delivery));
        },

        Commands::TripInfo {
            journey_ref,
            operating_day,
        } => {
            let delivery = client
                .trip_info(&journey_ref, &operating_day, Some(TripInfoParams::full()))
                .await?;
            match delivery.result {
                Some(result) => print!("{}", output::trip_info(&result)),
                None => println!("No journey found"),
            }
        },
    }

    Ok(())
}

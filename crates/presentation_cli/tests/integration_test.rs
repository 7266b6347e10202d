//! Integration tests for CLI
//!
//! These tests verify argument parsing without contacting an endpoint.

#![allow(clippy::panic)] // Allow panic! in tests for clear failure messages

use std::ffi::OsString;

use chrono::{DateTime, Utc};
use clap::Parser;
use integration_ojp::model::PlaceTypeRestriction;

// Mock CLI structure for testing (mirrors main.rs)
#[derive(Parser)]
#[command(name = "ojp-cli")]
#[command(author, version, about = "Open Journey Planner 2.0 client", long_about = None)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    Places {
        name: String,
        #[arg(short = 't', long = "type", default_value = "stop")]
        types: Vec<PlaceTypeRestriction>,
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(short, long, default_value = "1000")]
        radius: f64,
    },
    Trips {
        from: String,
        to: String,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        #[arg(long)]
        arrive: bool,
        #[arg(short, long)]
        count: Option<u32>,
        #[arg(long, default_value = "0")]
        previous: u32,
        #[arg(long, default_value = "0")]
        next: u32,
    },
    StopEvents {
        stop: String,
        #[arg(long)]
        arrivals: bool,
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
    TripInfo {
        journey_ref: String,
        operating_day: String,
    },
}

fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
    let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
    Cli::try_parse_from(os_args)
}

#[test]
fn cli_parses_places_with_defaults() {
    let cli = parse_args(&["ojp-cli", "places", "Bern"]).unwrap();
    if let Commands::Places { name, types, limit } = cli.command {
        assert_eq!(name, "Bern");
        assert_eq!(types, [PlaceTypeRestriction::Stop]);
        assert_eq!(limit, 10);
    } else {
        panic!("Expected Places command");
    }
}

#[test]
fn cli_rejects_unknown_place_type() {
    assert!(parse_args(&["ojp-cli", "places", "Bern", "-t", "harbour"]).is_err());
}

#[test]
fn cli_parses_negative_coordinates() {
    let cli = parse_args(&["ojp-cli", "nearby", "--lat", "-33.86", "--lon", "-151.2"]).unwrap();
    if let Commands::Nearby { lat, lon, radius } = cli.command {
        assert!((lat + 33.86).abs() < f64::EPSILON);
        assert!((lon + 151.2).abs() < f64::EPSILON);
        assert!((radius - 1000.0).abs() < f64::EPSILON);
    } else {
        panic!("Expected Nearby command");
    }
}

#[test]
fn cli_parses_trip_paging() {
    let cli = parse_args(&[
        "ojp-cli", "trips", "8507000", "8503000", "--count", "4", "--previous", "1", "--next", "2",
    ])
    .unwrap();
    if let Commands::Trips {
        from,
        to,
        at,
        arrive,
        count,
        previous,
        next,
    } = cli.command
    {
        assert_eq!(from, "8507000");
        assert_eq!(to, "8503000");
        assert!(at.is_none());
        assert!(!arrive);
        assert_eq!(count, Some(4));
        assert_eq!((previous, next), (1, 2));
    } else {
        panic!("Expected Trips command");
    }
}

#[test]
fn cli_parses_arrival_time() {
    let cli = parse_args(&[
        "ojp-cli",
        "trips",
        "8507000",
        "8503000",
        "--at",
        "2024-05-13T10:00:00+02:00",
        "--arrive",
    ])
    .unwrap();
    if let Commands::Trips { at, arrive, .. } = cli.command {
        assert!(arrive);
        assert_eq!(at.unwrap().to_rfc3339(), "2024-05-13T08:00:00+00:00");
    } else {
        panic!("Expected Trips command");
    }
}

#[test]
fn cli_rejects_malformed_time() {
    assert!(parse_args(&["ojp-cli", "trips", "a", "b", "--at", "tomorrow"]).is_err());
}

#[test]
fn cli_trips_requires_both_ends() {
    assert!(parse_args(&["ojp-cli", "trips", "8507000"]).is_err());
}

#[test]
fn cli_parses_stop_events() {
    let cli = parse_args(&["ojp-cli", "stop-events", "8507000", "--arrivals", "-l", "5"]).unwrap();
    if let Commands::StopEvents {
        stop,
        arrivals,
        limit,
    } = cli.command
    {
        assert_eq!(stop, "8507000");
        assert!(arrivals);
        assert_eq!(limit, 5);
    } else {
        panic!("Expected StopEvents command");
    }
}

#[test]
fn cli_parses_trip_info() {
    let cli = parse_args(&["ojp-cli", "trip-info", "ch:1:sjyid:100001:802-001", "2024-05-13"])
        .unwrap();
    assert!(matches!(cli.command, Commands::TripInfo { .. }));
}

#[test]
fn cli_parses_multiple_verbose_flags() {
    let cli = parse_args(&["ojp-cli", "-vvv", "--config", "ojp.toml", "places", "Bern"]).unwrap();
    assert_eq!(cli.verbose, 3);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("ojp.toml")));
}

#[test]
fn cli_requires_subcommand() {
    assert!(parse_args(&["ojp-cli"]).is_err());
}

//! `geojson2charger` — snap charging stations onto graph nodes.
//!
//! Reads a GeoJSON feature collection of charging stations (point geometry
//! plus a `rate` property in watts), snaps each station to the nearest
//! graph node within 500 m, and writes the per-node `charger` file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use watt_core::coord::haversine_distance;
use watt_core::{Coordinate, TimedLogger};
use watt_graph::{files, NearestIndex};

/// Stations further than this from any node are dropped.
const SNAP_RADIUS_M: f64 = 500.0;

#[derive(Parser)]
#[command(about = "Import charging stations from GeoJSON")]
struct Args {
    /// GeoJSON feature collection of charging stations.
    geojson: PathBuf,

    /// Graph directory providing the coordinates.
    graph_dir: PathBuf,

    /// Output directory for the charger file (created if missing).
    out_dir: PathBuf,
}

fn charger_from_geojson(geojson: &serde_json::Value, coordinates: &[Coordinate]) -> Vec<f64> {
    let mut chargers = vec![0.0; coordinates.len()];
    let nearest = NearestIndex::new(coordinates);

    let features = geojson["features"].as_array();
    for feature in features.into_iter().flatten() {
        let position = &feature["geometry"]["coordinates"];
        let (Some(lon), Some(lat)) = (position[0].as_f64(), position[1].as_f64()) else {
            continue;
        };
        let Some(rate) = feature["properties"]["rate"].as_f64() else {
            continue;
        };

        let station = Coordinate::from_floating(lon, lat);
        let Some(node) = nearest.nearest(station) else {
            continue;
        };
        if haversine_distance(coordinates[node.index()], station) < SNAP_RADIUS_M {
            chargers[node.index()] = rate;
        }
    }

    chargers
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let read = TimedLogger::new("Reading charging stations");
    let geojson: serde_json::Value = serde_json::from_reader(std::fs::File::open(&args.geojson)?)?;
    read.finished();

    let coords = TimedLogger::new("Reading coordinates");
    let coordinates = files::read_coordinates(&args.graph_dir)?;
    coords.finished();

    let convert = TimedLogger::new("Converting to chargers");
    let chargers = charger_from_geojson(&geojson, &coordinates);
    convert.finished();

    // Rate histogram for a quick sanity check of the import.
    let mut rate_counts: std::collections::BTreeMap<u64, usize> = std::collections::BTreeMap::new();
    for &rate in &chargers {
        if rate > 0.0 {
            *rate_counts.entry(rate as u64).or_default() += 1;
        }
    }
    for (rate, count) in rate_counts {
        tracing::info!("{} kW: {count}", rate as f64 / 1000.0);
    }

    std::fs::create_dir_all(&args.out_dir)?;
    files::write_chargers(&args.out_dir, &chargers)?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

//! `graph2turngraph` — expand a node graph into its turn graph.
//!
//! The output graph has one node per input edge; coordinates and heights
//! are remapped to each edge's start node.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use watt_core::TimedLogger;
use watt_graph::turn::to_turn_graph;
use watt_graph::{files, GraphError, TurnCostModel};

#[derive(Parser)]
#[command(about = "Expand a graph into its turn graph with a turn cost model")]
struct Args {
    /// Turn cost model: zero, static, max, avg_consumption, avg_consumption_static.
    model: String,

    /// Input graph directory.
    in_dir: PathBuf,

    /// Output graph directory (created if missing).
    out_dir: PathBuf,
}

fn run(args: &Args) -> Result<(), GraphError> {
    let load = TimedLogger::new("Loading graph");
    let graph = files::read_graph(&args.in_dir)?;
    let coordinates = files::read_coordinates(&args.in_dir)?;
    let heights = files::read_heights(&args.in_dir)?;
    let model = TurnCostModel::from_name(&args.model, &coordinates)?;
    load.finished();

    let convert = TimedLogger::new("Converting graph");
    let (turn_graph, edge_to_start_node) = to_turn_graph(&graph, &model);

    let out_coordinates: Vec<_> = edge_to_start_node
        .iter()
        .map(|node| coordinates[node.index()])
        .collect();
    let out_heights: Vec<_> = edge_to_start_node
        .iter()
        .map(|node| heights[node.index()])
        .collect();
    convert.finished();

    let write = TimedLogger::new("Writing graph");
    std::fs::create_dir_all(&args.out_dir)?;
    files::write_graph(&args.out_dir, &turn_graph)?;
    files::write_coordinates(&args.out_dir, &out_coordinates)?;
    files::write_heights(&args.out_dir, &out_heights)?;
    write.finished();

    tracing::info!(
        "{} nodes, {} edges -> {} nodes, {} edges",
        graph.num_nodes(),
        graph.num_edges(),
        turn_graph.num_nodes(),
        turn_graph.num_edges()
    );
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

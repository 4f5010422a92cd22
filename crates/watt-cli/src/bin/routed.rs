//! `routed` — load a graph directory and serve routing queries over HTTP.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use watt_server::{http, Engine};

#[derive(Parser)]
#[command(about = "EV routing query server")]
struct Args {
    /// Graph directory (first_out, head, weight, coordinates, heights, charger).
    graph_dir: PathBuf,

    /// Battery capacity in Wh.
    capacity: f64,

    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let engine = match Engine::open(&args.graph_dir, args.capacity) {
        Ok(engine) => Arc::new(engine),
        Err(error) => {
            tracing::error!("failed to load {}: {error}", args.graph_dir.display());
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("loaded graph with {} nodes", engine.num_nodes());
    if let Err(error) = http::serve(engine, args.port).await {
        tracing::error!("server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

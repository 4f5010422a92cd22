//! The query engine facade.
//!
//! `Engine::open` loads a §6-format graph directory, builds the spatial
//! index, and constructs one handler per requested algorithm.  Queries are
//! dispatched by algorithm id; each handler serialises its own queries
//! behind a mutex, so independent handlers answer concurrently while a
//! single handler never interleaves two searches on one context.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use watt_core::{Coordinate, NodeId, TimedLogger};
use watt_graph::{files, NearestIndex, TradeoffGraph};
use watt_search::ChargerIndex;

use crate::error::EngineError;
use crate::handlers::{
    AlgorithmHandler, FastestHandler, FpHandler, FpcHandler, McHandler, MccHandler,
};
use crate::result::RouteResult;

// ── algorithm ids ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Algorithm {
    FastestBiDijkstra,
    McDijkstra,
    MccDijkstra,
    FpDijkstra,
    FpcDijkstra,
    FpcProfileDijkstra,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::FastestBiDijkstra,
        Algorithm::McDijkstra,
        Algorithm::MccDijkstra,
        Algorithm::FpDijkstra,
        Algorithm::FpcDijkstra,
        Algorithm::FpcProfileDijkstra,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::FastestBiDijkstra => "fastest_bi_dijkstra",
            Algorithm::McDijkstra => "mc_dijkstra",
            Algorithm::MccDijkstra => "mcc_dijkstra",
            Algorithm::FpDijkstra => "fp_dijkstra",
            Algorithm::FpcDijkstra => "fpc_dijkstra",
            Algorithm::FpcProfileDijkstra => "fpc_profile_dijkstra",
        }
    }
}

impl FromStr for Algorithm {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == value)
            .ok_or_else(|| EngineError::UnknownAlgorithm(value.to_string()))
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── shared graph data ─────────────────────────────────────────────────────────

/// Everything immutable that handlers share by reference.
pub struct GraphData {
    pub graph: TradeoffGraph,
    pub coordinates: Vec<Coordinate>,
    pub heights: Vec<i32>,
    pub chargers: ChargerIndex,
}

/// Result of a `/nearest` query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestResult {
    pub id: u32,
    pub coordinate: Coordinate,
}

// ── engine ────────────────────────────────────────────────────────────────────

pub struct Engine {
    data: Arc<GraphData>,
    nearest: NearestIndex,
    handlers: FxHashMap<Algorithm, Box<dyn AlgorithmHandler>>,
}

impl Engine {
    /// Load a graph directory and build all algorithms.
    pub fn open(dir: &Path, capacity: f64) -> Result<Engine, EngineError> {
        Self::open_with(dir, capacity, &Algorithm::ALL)
    }

    /// Load a graph directory and build the requested algorithms only.
    pub fn open_with(
        dir: &Path,
        capacity: f64,
        algorithms: &[Algorithm],
    ) -> Result<Engine, EngineError> {
        let load = TimedLogger::new("Loading graph");
        let graph = files::read_graph(dir)?;
        let coordinates = files::read_coordinates(dir)?;
        let heights = files::read_heights(dir)?;
        let charger_rates = files::read_chargers(dir)?;
        load.finished();

        let data = Arc::new(GraphData {
            graph,
            coordinates,
            heights,
            chargers: ChargerIndex::new(charger_rates, capacity),
        });

        let build = TimedLogger::new("Building handlers");
        let nearest = NearestIndex::new(&data.coordinates);

        let mut handlers: FxHashMap<Algorithm, Box<dyn AlgorithmHandler>> = FxHashMap::default();
        for &algorithm in algorithms {
            let handler: Box<dyn AlgorithmHandler> = match algorithm {
                Algorithm::FastestBiDijkstra => Box::new(FastestHandler::new(Arc::clone(&data))),
                Algorithm::McDijkstra => Box::new(McHandler::new(Arc::clone(&data), capacity)),
                Algorithm::MccDijkstra => Box::new(MccHandler::new(Arc::clone(&data), capacity)),
                Algorithm::FpDijkstra => Box::new(FpHandler::new(Arc::clone(&data), capacity)),
                Algorithm::FpcDijkstra => {
                    Box::new(FpcHandler::new(Arc::clone(&data), capacity, false))
                }
                Algorithm::FpcProfileDijkstra => {
                    Box::new(FpcHandler::new(Arc::clone(&data), capacity, true))
                }
            };
            handlers.insert(algorithm, handler);
        }
        build.finished();

        Ok(Engine { data, nearest, handlers })
    }

    pub fn num_nodes(&self) -> usize {
        self.data.graph.num_nodes()
    }

    /// Answer a routing query.
    pub fn route(
        &self,
        algorithm: Algorithm,
        start: u32,
        target: u32,
        search_space: bool,
    ) -> Result<Vec<RouteResult>, EngineError> {
        let num_nodes = self.data.graph.num_nodes() as u32;
        for id in [start, target] {
            if id >= num_nodes {
                return Err(EngineError::NodeOutOfRange(id));
            }
        }

        let handler = self
            .handlers
            .get(&algorithm)
            .ok_or_else(|| EngineError::UnknownAlgorithm(algorithm.name().to_string()))?;

        let mut routes = handler.route(NodeId(start), NodeId(target), search_space)?;
        for route in &mut routes {
            crate::result::annotate_heights(route, &self.data.heights);
            crate::result::annotate_coordinates(route, &self.data.coordinates);
            crate::result::annotate_lengths(route);
            crate::result::annotate_max_speeds(route, &self.data.graph);
        }
        Ok(routes)
    }

    /// Snap a coordinate to the nearest graph node.
    pub fn nearest(&self, coordinate: Coordinate) -> Option<NearestResult> {
        self.nearest.nearest(coordinate).map(|id| NearestResult {
            id: id.0,
            coordinate: self.data.coordinates[id.index()],
        })
    }
}

//! Route results: reconstruction from labels and annotation passes.
//!
//! Reconstruction walks the parent chain of a settled target label.  For
//! point costs the per-node durations are the label costs themselves; for
//! functional costs the walk picks the fastest feasible total time and maps
//! it backwards through each label's delta (total time at a node ↦ arrival
//! time at its parent), which also splits off charging time at stops.

use watt_core::coord::haversine_distance;
use watt_core::{Coordinate, NodeId};
use watt_func::PiecewiseFunction;
use watt_graph::TradeoffGraph;
use watt_search::{ChargerIndex, NodeLabels, PairLabel, TradeoffLabel};

// ── result types ──────────────────────────────────────────────────────────────

/// One node of the explored search space.
#[derive(Debug, Clone)]
pub struct SearchSpaceNode {
    pub coordinate: Coordinate,
    pub id: u32,
    pub num_settled_labels: usize,
    pub is_charging_station: bool,
}

/// A single routing solution.
#[derive(Debug, Clone, Default)]
pub struct RouteResult {
    /// Duration (s) ↦ consumption (Wh) front of the full route.
    pub tradeoff: PiecewiseFunction,
    /// Cumulative durations per path node, in seconds.
    pub durations: Vec<f64>,
    /// Cumulative consumptions per path node, in Wh.
    pub consumptions: Vec<f64>,
    /// Cumulative path lengths per node, in metres.
    pub lengths: Vec<f64>,
    /// Maximum speed per path edge, in km/h.
    pub max_speeds: Vec<f64>,
    /// Height per path node, in metres.
    pub heights: Vec<i32>,
    /// Node ids along the route.
    pub path: Vec<u32>,
    /// Coordinates per path node.
    pub geometry: Vec<Coordinate>,
    /// Explored nodes, when requested.
    pub search_space: Vec<SearchSpaceNode>,
}

// ── annotation passes ─────────────────────────────────────────────────────────

pub fn annotate_heights(route: &mut RouteResult, heights: &[i32]) {
    route.heights = route.path.iter().map(|&id| heights[id as usize]).collect();
}

pub fn annotate_coordinates(route: &mut RouteResult, coordinates: &[Coordinate]) {
    route.geometry = route.path.iter().map(|&id| coordinates[id as usize]).collect();
}

/// Needs the geometry annotated first.
pub fn annotate_lengths(route: &mut RouteResult) {
    let mut length = 0.0;
    route.lengths.clear();
    route.lengths.push(0.0);
    for pair in route.geometry.windows(2) {
        length += haversine_distance(pair[0], pair[1]);
        route.lengths.push(length);
    }
}

/// Needs the lengths annotated first.
pub fn annotate_max_speeds(route: &mut RouteResult, graph: &TradeoffGraph) {
    route.max_speeds.clear();
    for index in 0..route.path.len().saturating_sub(1) {
        let from = NodeId(route.path[index]);
        let to = NodeId(route.path[index + 1]);
        if from == to {
            // A charging stop: no movement.
            route.max_speeds.push(0.0);
            continue;
        }
        let length = route.lengths[index + 1] - route.lengths[index];
        match graph.edge(from, to) {
            Some(edge) => {
                let weight = graph.weight(edge);
                route.max_speeds.push(length / weight.min_x * 3.6);
            }
            None => route.max_speeds.push(0.0),
        }
    }
}

// ── search space ──────────────────────────────────────────────────────────────

pub fn get_search_space<L>(
    labels: &NodeLabels<L>,
    chargers: Option<&ChargerIndex>,
    coordinates: &[Coordinate],
) -> Vec<SearchSpaceNode>
where
    L: watt_search::SearchLabel,
{
    let mut search_space = Vec::new();
    for node in 0..labels.settled.len() {
        let settled = &labels.settled[node];
        if settled.is_empty() {
            continue;
        }
        let id = NodeId(node as u32);
        search_space.push(SearchSpaceNode {
            coordinate: coordinates[node],
            id: id.0,
            num_settled_labels: settled.len(),
            is_charging_station: chargers.is_some_and(|c| c.has(id)),
        });
    }
    search_space
}

// ── reconstruction ────────────────────────────────────────────────────────────

/// Result of a scalar fastest-path query: per-node durations from the edge
/// minima, consumptions by evaluating each edge's trade-off at the driven
/// duration.
pub fn to_result_scalar(graph: &TradeoffGraph, path: &[NodeId]) -> RouteResult {
    let mut route = RouteResult::default();
    route.path = path.iter().map(|n| n.0).collect();

    route.durations.push(0.0);
    route.consumptions.push(0.0);
    let mut total_duration = 0.0;
    let mut total_consumption = 0.0;
    for pair in path.windows(2) {
        if let Some(edge) = graph.edge(pair[0], pair[1]) {
            let weight = graph.weight(edge);
            total_duration += weight.min_x;
            total_consumption += weight.eval(weight.min_x);
        }
        route.durations.push(total_duration);
        route.consumptions.push(total_consumption);
    }

    route.tradeoff = PiecewiseFunction::constant(total_duration, total_consumption);
    route
}

/// Result of a multi-criteria query: the parent chain carries cumulative
/// point costs directly.
pub fn to_result_pairs(
    target: NodeId,
    label: &PairLabel,
    labels: &NodeLabels<PairLabel>,
) -> RouteResult {
    let mut route = RouteResult::default();
    route.tradeoff =
        PiecewiseFunction::constant(label.duration.to_f64(), label.consumption.to_f64());

    // Chain and node sequence, target-first.
    let mut chain = vec![label.clone()];
    let mut nodes = vec![target];
    let mut current = label.clone();
    while current.parent != NodeId::INVALID {
        nodes.push(current.parent);
        current = labels.settled[current.parent.index()][current.parent_entry as usize].clone();
        chain.push(current.clone());
    }

    nodes.reverse();
    chain.reverse();

    for label in &chain {
        route.durations.push(label.duration.to_f64());
        route.consumptions.push(label.consumption.to_f64());
    }
    route.path = nodes.iter().map(|n| n.0).collect();
    route
}

/// Result of a functional Pareto query at the fastest feasible total time.
pub fn to_result_tradeoff(
    target: NodeId,
    label: &TradeoffLabel,
    labels: &NodeLabels<TradeoffLabel>,
) -> RouteResult {
    let mut route = RouteResult::default();
    route.tradeoff = label.cost.clone();

    let mut durations = Vec::new();
    let mut consumptions = Vec::new();
    let mut path = Vec::new();

    let mut node = target;
    let mut current = label.clone();
    let mut time = label.cost.min_x();
    loop {
        path.push(node.0);
        durations.push(time);
        consumptions.push(current.cost.eval(time.max(current.cost.min_x())));

        if current.parent == NodeId::INVALID {
            break;
        }
        // Arrival time at the parent; the max guards against rounding just
        // below the delta's domain.
        time = current.delta.eval(time.max(current.delta.min_x()));
        node = current.parent;
        current = labels.settled[node.index()][current.parent_entry as usize].clone();
    }

    path.reverse();
    durations.reverse();
    consumptions.reverse();

    route.path = path;
    route.durations = durations;
    route.consumptions = consumptions;
    route
}

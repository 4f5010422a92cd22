//! Derived scalar graphs from the trade-off graph.
//!
//! Each search variant runs on a projection of the trade-off graph: the
//! fastest-path search and the ALT potentials use minimum durations, the
//! sampled multi-criteria search uses discrete `(duration, consumption)`
//! points along each trade-off curve.

use watt_core::Fixed;

use crate::csr::Edge;
use crate::{ConsumptionGraph, DurationGraph, SampledGraph, TradeoffGraph};

/// Project every edge onto its fastest duration.
pub fn to_min_duration(graph: &TradeoffGraph) -> DurationGraph {
    graph.map_weights(|w| Fixed::from_f64(w.min_x))
}

/// Project every edge onto its cheapest consumption (the slow end).
pub fn to_min_consumption(graph: &TradeoffGraph) -> ConsumptionGraph {
    graph.map_weights(|w| Fixed::from_f64(w.min_y()))
}

/// Sample every trade-off curve at `resolution`-second steps into parallel
/// `(duration, consumption)` edges.
///
/// The slow endpoint is always included so the cheapest option survives
/// sampling.
pub fn to_sampled(graph: &TradeoffGraph, resolution: f64) -> SampledGraph {
    let mut edges = Vec::new();
    for (from, to, weight) in graph.edge_list() {
        let mut t = weight.min_x;
        while t < weight.max_x {
            edges.push(Edge::new(
                from,
                to,
                (Fixed::from_f64(t), Fixed::from_f64(weight.eval(t))),
            ));
            t += resolution;
        }
        edges.push(Edge::new(
            from,
            to,
            (Fixed::from_f64(weight.max_x), Fixed::from_f64(weight.min_y())),
        ));
    }
    SampledGraph::from_edges(graph.num_nodes(), edges)
}

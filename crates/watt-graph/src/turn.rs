//! Turn-cost models and the line-graph expansion.
//!
//! Turn restrictions and penalties cannot be expressed on a node graph, so
//! preprocessing expands the road graph into its line graph: every input
//! edge becomes a node, and a turn `(u→v, v→w)` becomes an edge weighted by
//! the in-edge's trade-off plus a model-dependent turn penalty.

use watt_core::coord::{bearing, haversine_distance};
use watt_core::{Coordinate, NodeId};
use watt_func::{HypOrLin, LimitedFunction};

use crate::dynamic::DynamicGraph;
use crate::error::{GraphError, GraphResult};
use crate::TradeoffGraph;

// ── physical driving model ────────────────────────────────────────────────────

mod physical {
    /// m/s² on dry ground.
    const CAR_MAX_BRAKE_DEACCELERATION: f64 = 8.0;
    /// m/s² for a small EV.
    const CAR_MAX_ACCELERATION: f64 = 2.7;
    /// Vehicle mass in kg.
    const MASS: f64 = 1080.0;
    /// Fraction of braking energy recuperated.
    const RECUPERATION: f64 = 0.3;
    /// Motor efficiency when accelerating.
    const EFFICIENCY: f64 = 0.8;
    const WS_TO_WH: f64 = 1.0 / 60.0 / 60.0;

    pub fn brake_time(from_speed: f64, to_speed: f64) -> f64 {
        if from_speed <= to_speed {
            return 0.0;
        }
        (from_speed - to_speed) / CAR_MAX_BRAKE_DEACCELERATION
    }

    pub fn speedup_time(from_speed: f64, to_speed: f64) -> f64 {
        if from_speed >= to_speed {
            return 0.0;
        }
        (to_speed - from_speed) / CAR_MAX_ACCELERATION
    }

    /// Negative: braking recuperates energy.
    pub fn brake_consumption(from_speed: f64, to_speed: f64) -> f64 {
        if from_speed <= to_speed {
            return 0.0;
        }
        let energy = 0.5
            * MASS
            * (from_speed * from_speed - to_speed * to_speed)
            * RECUPERATION
            * WS_TO_WH;
        -energy
    }

    pub fn speedup_consumption(from_speed: f64, to_speed: f64) -> f64 {
        if from_speed >= to_speed {
            return 0.0;
        }
        0.5 * MASS * (to_speed * to_speed - from_speed * from_speed) / EFFICIENCY * WS_TO_WH
    }

    pub fn brake_length(from_speed: f64, to_speed: f64) -> f64 {
        if from_speed <= to_speed {
            return 0.0;
        }
        brake_time(from_speed, to_speed) * (from_speed + 0.5 * (to_speed - from_speed))
    }

    pub fn speedup_length(from_speed: f64, to_speed: f64) -> f64 {
        if from_speed >= to_speed {
            return 0.0;
        }
        speedup_time(from_speed, to_speed) * (from_speed + 0.5 * (to_speed - from_speed))
    }
}

// ── turn cost models ──────────────────────────────────────────────────────────

/// How a turn `(from → via → to)` penalises the in-edge's trade-off.
pub enum TurnCostModel<'a> {
    /// Only the U-turn penalty.
    Zero,
    /// Empirical angle-dependent time penalty.
    Static { coordinates: &'a [Coordinate] },
    /// Physical brake/accelerate model assuming maximum speed on both edges.
    Max { coordinates: &'a [Coordinate] },
    /// Averaged consumption penalty over the speed envelope.
    AvgConsumption { coordinates: &'a [Coordinate] },
    /// Averaged consumption penalty plus the empirical time penalty.
    AvgConsumptionStatic { coordinates: &'a [Coordinate] },
}

impl<'a> TurnCostModel<'a> {
    pub const UTURN_COST: f64 = 20.0;
    const STATIC_COST: f64 = 7.5;

    /// Select a model by name, as the `graph2turngraph` CLI does.
    pub fn from_name(name: &str, coordinates: &'a [Coordinate]) -> GraphResult<Self> {
        match name {
            "zero" => Ok(TurnCostModel::Zero),
            "static" => Ok(TurnCostModel::Static { coordinates }),
            "max" => Ok(TurnCostModel::Max { coordinates }),
            "avg_consumption" => Ok(TurnCostModel::AvgConsumption { coordinates }),
            "avg_consumption_static" => Ok(TurnCostModel::AvgConsumptionStatic { coordinates }),
            other => Err(GraphError::UnknownTurnCostModel(other.into())),
        }
    }

    /// Cost of traversing `from → via` and then turning onto `via → to`.
    pub fn apply(
        &self,
        graph: &TradeoffGraph,
        degree: usize,
        from: NodeId,
        via: NodeId,
        to: NodeId,
    ) -> Option<LimitedFunction> {
        let in_edge = graph.edge(from, via)?;
        let mut cost = *graph.weight(in_edge);

        match self {
            TurnCostModel::Zero => {}
            TurnCostModel::Static { coordinates } => {
                if degree > 2 {
                    cost.shift(static_penalty(coordinates, from, via, to));
                }
            }
            TurnCostModel::Max { coordinates } => {
                let out_edge = graph.edge(via, to)?;
                let to_cost = graph.weight(out_edge);
                cost = max_speed_cost(coordinates, &cost, to_cost, from, via, to);
            }
            TurnCostModel::AvgConsumption { coordinates } => {
                let out_edge = graph.edge(via, to)?;
                let to_cost = graph.weight(out_edge);
                cost.offset(avg_consumption_penalty(coordinates, &cost, to_cost, from, via, to));
            }
            TurnCostModel::AvgConsumptionStatic { coordinates } => {
                let out_edge = graph.edge(via, to)?;
                let to_cost = graph.weight(out_edge);
                cost.offset(avg_consumption_penalty(coordinates, &cost, to_cost, from, via, to));
                if degree > 2 {
                    cost.shift(static_penalty(coordinates, from, via, to));
                }
                return Some(cost);
            }
        }

        if from == to {
            cost.shift(Self::UTURN_COST);
        }

        Some(cost)
    }
}

/// Empirical sigmoid turn penalty: near zero for straight-through, rising to
/// `STATIC_COST` seconds for full turnarounds.
fn static_penalty(coordinates: &[Coordinate], from: NodeId, via: NodeId, to: NodeId) -> f64 {
    let from_bearing = bearing(coordinates[via.index()], coordinates[from.index()]);
    let to_bearing = bearing(coordinates[via.index()], coordinates[to.index()]);
    let mut angle = from_bearing - to_bearing;
    if angle < -180.0 {
        angle += 360.0;
    } else if angle > 180.0 {
        angle -= 360.0;
    }

    TurnCostModel::STATIC_COST
        / (1.0 + (-(13.0 * (180.0 - angle.abs()) / 180.0 - 6.5)).exp())
}

/// Assume both edges are driven at maximum speed; penalise the transition
/// with the physical brake/accelerate model and shrink the trade-off to the
/// unconstrained remainder of the segment.
fn max_speed_cost(
    coordinates: &[Coordinate],
    from_cost: &LimitedFunction,
    to_cost: &LimitedFunction,
    from: NodeId,
    via: NodeId,
    to: NodeId,
) -> LimitedFunction {
    use physical::*;

    let from_length = haversine_distance(coordinates[from.index()], coordinates[via.index()]);
    let to_length = haversine_distance(coordinates[via.index()], coordinates[to.index()]);

    let arrive_speed = from_length / from_cost.min_x;
    let leave_speed = to_length / to_cost.min_x;

    let mut cost = *from_cost;
    if (arrive_speed - leave_speed).abs() > 1.0 {
        let time_penalty =
            speedup_time(arrive_speed, leave_speed) + brake_time(arrive_speed, leave_speed);
        let transition_length =
            speedup_length(arrive_speed, leave_speed) + brake_length(arrive_speed, leave_speed);
        let consumption_penalty = speedup_consumption(arrive_speed, leave_speed)
            + brake_consumption(arrive_speed, leave_speed);

        // The trade-off only applies to the speed-unconstrained remainder of
        // the segment.
        let alpha = (1.0 - transition_length / from_length).max(0.0);
        cost.min_x *= alpha;
        cost.max_x *= alpha;
        if let HypOrLin::Hyperbolic(hyp) = &mut cost.function {
            hyp.a *= alpha * alpha * alpha;
            hyp.c *= alpha;
        }

        cost.shift(time_penalty);
        cost.offset(consumption_penalty);
    }

    cost
}

/// Mean of the four transition-consumption corners of the speed envelope.
fn avg_consumption_penalty(
    coordinates: &[Coordinate],
    from_cost: &LimitedFunction,
    to_cost: &LimitedFunction,
    from: NodeId,
    via: NodeId,
    to: NodeId,
) -> f64 {
    use physical::*;

    let from_length = haversine_distance(coordinates[from.index()], coordinates[via.index()]);
    let to_length = haversine_distance(coordinates[via.index()], coordinates[to.index()]);

    let min_arrive = from_length / from_cost.min_x;
    let max_arrive = from_length / from_cost.max_x;
    let min_leave = to_length / to_cost.min_x;
    let max_leave = to_length / to_cost.max_x;

    let corner = |arrive: f64, leave: f64| {
        speedup_consumption(arrive, leave) + brake_consumption(arrive, leave)
    };

    let corners = [
        corner(min_arrive, min_leave),
        corner(min_arrive, max_leave),
        corner(max_arrive, min_leave),
        corner(max_arrive, max_leave),
    ];

    let max = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = corners.iter().copied().fold(f64::INFINITY, f64::min);
    (max + min) / 2.0
}

// ── line graph expansion ──────────────────────────────────────────────────────

/// Expand `graph` into its turn graph.
///
/// Returns the line graph (one node per input edge) and the map from
/// line-graph node to the start node of the input edge it represents, used
/// to remap coordinates and heights.
pub fn to_turn_graph(
    graph: &TradeoffGraph,
    model: &TurnCostModel<'_>,
) -> (TradeoffGraph, Vec<NodeId>) {
    let num_edges = graph.num_edges();
    let mut line = DynamicGraph::new(num_edges);
    let mut edge_to_start_node = vec![NodeId::INVALID; num_edges];

    for (edge_index, (from, via, _)) in graph.edge_list().enumerate() {
        edge_to_start_node[edge_index] = from;

        for (out_edge, to) in graph.edges(via) {
            if let Some(weight) = model.apply(graph, graph.degree(via), from, via, to) {
                line.insert_edge(NodeId(edge_index as u32), NodeId(out_edge.0), weight);
            }
        }
    }

    (line.to_csr(), edge_to_start_node)
}

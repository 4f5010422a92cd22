//! Functional Pareto search.
//!
//! Labels carry a full piecewise duration/consumption front instead of a
//! point.  Relaxation links the front with the edge trade-off, clips it at
//! the battery capacity, and tracks the delta (parent arrival time as a
//! function of total time) for path reconstruction.

use watt_core::{Fixed, NodeId};
use watt_func::{link_tradeoff, LimitedFunction};
use watt_graph::TradeoffGraph;

use crate::labels::NodeLabels;
use crate::mc::{run_search, SearchPolicy};
use crate::policy::{TradeoffLabel, TradeoffPolicy};
use crate::potential::{LandmarkPotentials, ZeroPotentials};
use crate::queue::MinIdQueue;

impl SearchPolicy for TradeoffPolicy {
    type EdgeWeight = LimitedFunction;

    fn seed(&self, _start: NodeId) -> TradeoffLabel {
        TradeoffLabel::start()
    }

    fn link(
        &self,
        label: &TradeoffLabel,
        edge: &LimitedFunction,
        node: NodeId,
        entry: u32,
    ) -> Option<TradeoffLabel> {
        let (mut cost, mut delta) = link_tradeoff(&label.cost, edge);
        if cost.clip_above(self.capacity) {
            return None;
        }
        delta.limit_from_x(cost.min_x(), cost.max_x());
        Some(TradeoffLabel {
            key: Fixed::ZERO,
            cost,
            delta,
            parent: node,
            parent_entry: entry,
            charged_at: NodeId::INVALID,
        })
    }

    fn termination_slack(&self) -> Fixed {
        Fixed::from_f64(self.eps_x)
    }

    /// The utopia point of the linked label: fastest duration plus cheapest
    /// consumption.  If the head of the target's unsettled labels is already
    /// below that point, the full link cannot contribute.
    fn prune(
        &self,
        head: Option<&TradeoffLabel>,
        label: &TradeoffLabel,
        edge: &LimitedFunction,
    ) -> bool {
        let Some(head) = head else {
            return false;
        };
        let lb_duration = label.cost.min_x() + edge.min_x;
        let lb_consumption = label.cost.min_y() + edge.min_y();
        head.cost.eval(lb_duration + self.eps_x) <= lb_consumption + self.eps_y
    }
}

// ── query contexts ────────────────────────────────────────────────────────────

/// Functional Pareto search with plain Dijkstra ordering.
pub struct FpDijkstraContext {
    pub policy: TradeoffPolicy,
    queue: MinIdQueue,
    labels: NodeLabels<TradeoffLabel>,
    potentials: ZeroPotentials,
}

impl FpDijkstraContext {
    pub fn new(eps_x: f64, eps_y: f64, capacity: f64, num_nodes: usize) -> Self {
        Self {
            policy: TradeoffPolicy::new(eps_x, eps_y, capacity),
            queue: MinIdQueue::new(num_nodes),
            labels: NodeLabels::new(num_nodes),
            potentials: ZeroPotentials,
        }
    }

    pub fn run(
        &mut self,
        graph: &TradeoffGraph,
        start: NodeId,
        target: NodeId,
    ) -> Vec<TradeoffLabel> {
        run_search(
            graph,
            &mut self.queue,
            &mut self.labels,
            &mut self.potentials,
            &self.policy,
            start,
            target,
        )
    }

    pub fn labels(&self) -> &NodeLabels<TradeoffLabel> {
        &self.labels
    }
}

/// Functional Pareto search with landmark (ALT) goal direction.
pub struct FpAStarContext {
    pub policy: TradeoffPolicy,
    queue: MinIdQueue,
    labels: NodeLabels<TradeoffLabel>,
    potentials: LandmarkPotentials,
}

impl FpAStarContext {
    pub fn new(
        eps_x: f64,
        eps_y: f64,
        capacity: f64,
        potentials: LandmarkPotentials,
        num_nodes: usize,
    ) -> Self {
        Self {
            policy: TradeoffPolicy::new(eps_x, eps_y, capacity),
            queue: MinIdQueue::new(num_nodes),
            labels: NodeLabels::new(num_nodes),
            potentials,
        }
    }

    pub fn run(
        &mut self,
        graph: &TradeoffGraph,
        start: NodeId,
        target: NodeId,
    ) -> Vec<TradeoffLabel> {
        run_search(
            graph,
            &mut self.queue,
            &mut self.labels,
            &mut self.potentials,
            &self.policy,
            start,
            target,
        )
    }

    pub fn labels(&self) -> &NodeLabels<TradeoffLabel> {
        &self.labels
    }
}

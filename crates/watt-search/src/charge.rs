//! Charging search variants: MCC, FPC, and FPC-profile.
//!
//! Each wraps its base policy and adds charging successors when a label
//! settles at a station: the settled label spawns a sibling at the same
//! node whose cost includes plugging in (with a fixed per-stop penalty) and
//! whose `charged_at` tag prevents an immediate second charge at the same
//! station.

use watt_core::{Fixed, NodeId};
use watt_graph::{SampledGraph, TradeoffGraph};

use crate::charger::{link_charging, ChargeSegment, ChargerIndex};
use crate::labels::NodeLabels;
use crate::mc::{run_search, SearchPolicy};
use crate::policy::{DominancePolicy, PairLabel, PairPolicy, TradeoffLabel, TradeoffPolicy};
use crate::potential::LandmarkPotentials;
use crate::queue::MinIdQueue;

/// Fixed stop overhead per charging event, in seconds.
pub const CHARGING_PENALTY: f64 = 60.0;

/// Duration step at which the sampled (MCC) variant discretises charging.
pub const SAMPLE_RESOLUTION: f64 = 10.0;

const SOC_EPSILON: f64 = 1e-6;

// ── MCC ───────────────────────────────────────────────────────────────────────

/// Multi-criteria search with sampled charging stops.
pub struct MccPolicy {
    pub inner: PairPolicy,
    pub chargers: ChargerIndex,
    pub penalty: f64,
    pub resolution: f64,
}

impl DominancePolicy for MccPolicy {
    type Label = PairLabel;

    fn cost_key(&self, label: &PairLabel) -> Fixed {
        self.inner.cost_key(label)
    }
    fn dominates(&self, lhs: &PairLabel, rhs: &PairLabel) -> bool {
        self.inner.dominates(lhs, rhs)
    }
    fn dominated_by(&self, settled: &[PairLabel], label: &PairLabel) -> bool {
        self.inner.dominated_by(settled, label)
    }
    fn clip_dominated(&self, settled: &[PairLabel], label: &mut PairLabel) -> (bool, bool) {
        self.inner.clip_dominated(settled, label)
    }
    fn cleanup(&self, unsettled: &mut Vec<PairLabel>) {
        self.inner.cleanup(unsettled);
    }
}

impl SearchPolicy for MccPolicy {
    type EdgeWeight = (Fixed, Fixed);

    fn seed(&self, start: NodeId) -> PairLabel {
        self.inner.seed(start)
    }

    fn link(
        &self,
        label: &PairLabel,
        edge: &(Fixed, Fixed),
        node: NodeId,
        entry: u32,
    ) -> Option<PairLabel> {
        self.inner.link(label, edge, node, entry)
    }

    fn termination_slack(&self) -> Fixed {
        self.inner.termination_slack()
    }

    fn wants_cleanup(&self) -> bool {
        true
    }

    fn settled(&self, node: NodeId, label: &PairLabel, entry: u32, out: &mut Vec<PairLabel>) {
        let Some(charging) = self.chargers.function(node) else {
            return;
        };
        if label.charged_at == node {
            return;
        }

        let capacity = self.chargers.capacity();
        let soc = capacity - label.consumption.to_f64();
        if soc >= charging.capacity() - SOC_EPSILON {
            return;
        }

        // One successor per resolution step until the battery is full.
        let mut dt = self.resolution;
        loop {
            let new_soc = charging.charge(soc, dt);
            if new_soc <= soc + SOC_EPSILON {
                break;
            }
            out.push(PairLabel {
                key: Fixed::ZERO,
                duration: label.duration.saturating_add(Fixed::from_f64(self.penalty + dt)),
                consumption: Fixed::from_f64(capacity - new_soc),
                parent: node,
                parent_entry: entry,
                charged_at: node,
            });
            if new_soc >= charging.capacity() - SOC_EPSILON {
                break;
            }
            dt += self.resolution;
        }
    }
}

/// MCC query context: sampled graph, ALT potentials over minimum durations.
pub struct MccContext {
    pub policy: MccPolicy,
    queue: MinIdQueue,
    labels: NodeLabels<PairLabel>,
    potentials: LandmarkPotentials,
}

impl MccContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        eps_x: f64,
        eps_y: f64,
        resolution: f64,
        capacity: f64,
        penalty: f64,
        chargers: ChargerIndex,
        potentials: LandmarkPotentials,
        num_nodes: usize,
    ) -> Self {
        Self {
            policy: MccPolicy {
                inner: PairPolicy::new(
                    Fixed::from_f64(eps_x),
                    Fixed::from_f64(eps_y),
                    Fixed::from_f64(capacity),
                ),
                chargers,
                penalty,
                resolution,
            },
            queue: MinIdQueue::new(num_nodes),
            labels: NodeLabels::new(num_nodes),
            potentials,
        }
    }

    pub fn run(&mut self, graph: &SampledGraph, start: NodeId, target: NodeId) -> Vec<PairLabel> {
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

    pub fn labels(&self) -> &NodeLabels<PairLabel> {
        &self.labels
    }
}

// ── FPC ───────────────────────────────────────────────────────────────────────

/// Functional Pareto search with exact charging composition.
pub struct FpcPolicy {
    pub inner: TradeoffPolicy,
    pub chargers: ChargerIndex,
    pub penalty: f64,
    /// Per-station segment profiles; precomputed for the profile variant,
    /// rebuilt per settle otherwise.
    profiles: Option<Vec<Option<Vec<ChargeSegment>>>>,
}

impl FpcPolicy {
    pub fn new(inner: TradeoffPolicy, chargers: ChargerIndex, penalty: f64) -> Self {
        Self { inner, chargers, penalty, profiles: None }
    }

    /// Precompute every station's charging profile up front (the
    /// `fpc_profile` variant).
    pub fn with_profiles(inner: TradeoffPolicy, chargers: ChargerIndex, penalty: f64) -> Self {
        let profiles = (0..chargers.len())
            .map(|i| {
                chargers
                    .function(NodeId(i as u32))
                    .map(|charging| charging.segments())
            })
            .collect();
        Self { inner, chargers, penalty, profiles: Some(profiles) }
    }
}

impl DominancePolicy for FpcPolicy {
    type Label = TradeoffLabel;

    fn cost_key(&self, label: &TradeoffLabel) -> Fixed {
        self.inner.cost_key(label)
    }
    fn dominates(&self, lhs: &TradeoffLabel, rhs: &TradeoffLabel) -> bool {
        self.inner.dominates(lhs, rhs)
    }
    fn dominated_by(&self, settled: &[TradeoffLabel], label: &TradeoffLabel) -> bool {
        self.inner.dominated_by(settled, label)
    }
    fn clip_dominated(&self, settled: &[TradeoffLabel], label: &mut TradeoffLabel) -> (bool, bool) {
        self.inner.clip_dominated(settled, label)
    }
}

impl SearchPolicy for FpcPolicy {
    type EdgeWeight = watt_func::LimitedFunction;

    fn seed(&self, start: NodeId) -> TradeoffLabel {
        self.inner.seed(start)
    }

    fn link(
        &self,
        label: &TradeoffLabel,
        edge: &watt_func::LimitedFunction,
        node: NodeId,
        entry: u32,
    ) -> Option<TradeoffLabel> {
        self.inner.link(label, edge, node, entry)
    }

    fn termination_slack(&self) -> Fixed {
        self.inner.termination_slack()
    }

    fn prune(
        &self,
        head: Option<&TradeoffLabel>,
        label: &TradeoffLabel,
        edge: &watt_func::LimitedFunction,
    ) -> bool {
        self.inner.prune(head, label, edge)
    }

    fn settled(&self, node: NodeId, label: &TradeoffLabel, entry: u32, out: &mut Vec<TradeoffLabel>) {
        let Some(charging) = self.chargers.function(node) else {
            return;
        };
        if label.charged_at == node {
            return;
        }

        let segments = match &self.profiles {
            Some(profiles) => match profiles.get(node.index()).and_then(Option::as_ref) {
                Some(segments) => segments.clone(),
                None => return,
            },
            None => charging.segments(),
        };

        let Some((cost, delta)) = link_charging(
            &label.cost,
            charging,
            &segments,
            self.chargers.capacity(),
            self.penalty,
        ) else {
            return;
        };

        out.push(TradeoffLabel {
            key: Fixed::ZERO,
            cost,
            delta,
            parent: node,
            parent_entry: entry,
            charged_at: node,
        });
    }
}

/// FPC query context (exact charging), ALT potentials.
pub struct FpcContext {
    pub policy: FpcPolicy,
    queue: MinIdQueue,
    labels: NodeLabels<TradeoffLabel>,
    potentials: LandmarkPotentials,
}

impl FpcContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        eps_x: f64,
        eps_y: f64,
        capacity: f64,
        penalty: f64,
        chargers: ChargerIndex,
        potentials: LandmarkPotentials,
        num_nodes: usize,
        precompute_profiles: bool,
    ) -> Self {
        let inner = TradeoffPolicy::new(eps_x, eps_y, capacity);
        let policy = if precompute_profiles {
            FpcPolicy::with_profiles(inner, chargers, penalty)
        } else {
            FpcPolicy::new(inner, chargers, penalty)
        };
        Self {
            policy,
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

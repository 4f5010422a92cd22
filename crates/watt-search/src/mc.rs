//! The shared label-setting search engine and the multi-criteria variant.
//!
//! All Pareto searches (MC, FP, and their charging extensions) run the same
//! loop and differ only in their policy: how labels link over edges, when
//! they dominate each other, and which successors appear when a label
//! settles.  The loop:
//!
//! 1. pop the minimum-key node, settle its minimal label;
//! 2. re-queue the node if unsettled labels remain;
//! 3. emit charging successors of the settled label (policy hook);
//! 4. relax outgoing edges: cheap lower-bound prune, link, settled-dominance
//!    check, insert (with queue decrease/increase-key);
//! 5. terminate once the queue minimum exceeds the first settled target key
//!    by more than the duration epsilon.

use watt_core::{stats, Fixed, NodeId, StatsEvent};
use watt_graph::{CsrGraph, SampledGraph};

use crate::labels::NodeLabels;
use crate::policy::{DominancePolicy, PairLabel, PairPolicy, SearchLabel};
use crate::potential::{LandmarkPotentials, NodePotentials, ZeroPotentials};
use crate::queue::{IdKeyPair, MinIdQueue};

/// Unsettled-list size that triggers a Pareto cleanup (point costs only).
const CLEANUP_THRESHOLD: usize = 32;

// ── search policy ─────────────────────────────────────────────────────────────

/// What a search variant adds on top of its dominance policy.
pub trait SearchPolicy: DominancePolicy {
    type EdgeWeight;

    /// The label seeded at the source node.
    fn seed(&self, start: NodeId) -> Self::Label;

    /// Relax a settled label over an edge; `None` when infeasible under the
    /// battery constraint.
    fn link(
        &self,
        label: &Self::Label,
        edge: &Self::EdgeWeight,
        node: NodeId,
        entry: u32,
    ) -> Option<Self::Label>;

    /// Termination slack: the duration epsilon as a key difference.
    fn termination_slack(&self) -> Fixed;

    /// Cheap lower-bound check against the head of the target's unsettled
    /// labels, run before the full link.
    fn prune(
        &self,
        _head: Option<&Self::Label>,
        _label: &Self::Label,
        _edge: &Self::EdgeWeight,
    ) -> bool {
        false
    }

    /// Successor labels generated when a label settles (charging stops).
    fn settled(
        &self,
        _node: NodeId,
        _label: &Self::Label,
        _entry: u32,
        _out: &mut Vec<Self::Label>,
    ) {
    }

    /// Whether unsettled lists should be periodically Pareto-cleaned.
    fn wants_cleanup(&self) -> bool {
        false
    }
}

// ── engine ────────────────────────────────────────────────────────────────────

/// Push a label and keep the node's queue key in sync.
pub(crate) fn insert_label<P, N>(
    queue: &mut MinIdQueue,
    labels: &mut NodeLabels<P::Label>,
    policy: &P,
    potentials: &N,
    node: NodeId,
    label: P::Label,
) where
    P: SearchPolicy,
    N: NodePotentials,
{
    let min_changed = labels.push(node, label, policy, potentials);
    if labels.empty(node) {
        // Pushing re-checks dominance and may clip away the previous
        // minimum.  There is no random-access removal from the queue; a
        // stale entry stays until popped.
    } else if min_changed {
        sync_queue_key(queue, labels, node);
    }
}

fn sync_queue_key<L: SearchLabel>(queue: &mut MinIdQueue, labels: &NodeLabels<L>, node: NodeId) {
    let key = labels.min(node).key();
    if queue.contains_id(node.0) {
        let current = queue.get_key(node.0);
        if key < current {
            queue.decrease_key(IdKeyPair { id: node.0, key });
        } else if key > current {
            queue.increase_key(IdKeyPair { id: node.0, key });
        }
    } else {
        queue.push(IdKeyPair { id: node.0, key });
    }
}

/// Run a label-setting search; returns the settled target labels in settle
/// order (fastest first).
pub fn run_search<P, N>(
    graph: &CsrGraph<P::EdgeWeight>,
    queue: &mut MinIdQueue,
    labels: &mut NodeLabels<P::Label>,
    potentials: &mut N,
    policy: &P,
    start: NodeId,
    target: NodeId,
) -> Vec<P::Label>
where
    P: SearchPolicy,
    N: NodePotentials,
{
    queue.clear();
    labels.clear();
    potentials.recompute(queue, target);

    let mut seed = policy.seed(start);
    let seed_key = potentials.key(start, policy.cost_key(&seed));
    seed.set_key(seed_key);
    labels.push(start, seed, policy, potentials);
    queue.push(IdKeyPair { id: start.0, key: seed_key });

    let mut successors: Vec<P::Label> = Vec::new();

    while let Some(top) = queue.peek() {
        // The first settled target label carries the smallest target key.
        if let Some(best) = labels.settled_at(target).first().map(SearchLabel::key) {
            if top.key > best.saturating_add(policy.termination_slack()) {
                break;
            }
        }

        queue.pop();
        let node = NodeId(top.id);
        if labels.empty(node) {
            continue; // stale entry
        }

        let (label, entry) = labels.pop(node, policy, potentials);
        if !labels.empty(node) {
            queue.push(IdKeyPair { id: node.0, key: labels.min(node).key() });
        }

        successors.clear();
        policy.settled(node, &label, entry, &mut successors);
        for mut successor in successors.drain(..) {
            if labels.dominated(node, &successor, policy) {
                continue;
            }
            let key = potentials.key(node, policy.cost_key(&successor));
            successor.set_key(key);
            insert_label(queue, labels, policy, potentials, node, successor);
        }

        for (edge, to) in graph.edges(node) {
            stats::count(StatsEvent::DijkstraRelax);
            let weight = graph.weight(edge);

            let head = if labels.empty(to) { None } else { Some(labels.min(to)) };
            if policy.prune(head, &label, weight) {
                stats::count(StatsEvent::DijkstraPrune);
                continue;
            }

            let Some(mut new_label) = policy.link(&label, weight, node, entry) else {
                stats::count(StatsEvent::DijkstraConstraintClip);
                continue;
            };
            if labels.dominated(to, &new_label, policy) {
                continue;
            }

            let key = potentials.key(to, policy.cost_key(&new_label));
            new_label.set_key(key);
            insert_label(queue, labels, policy, potentials, to, new_label);

            if policy.wants_cleanup() && labels.size(to) > CLEANUP_THRESHOLD {
                labels.cleanup_unsettled(to, policy);
                if !labels.empty(to) {
                    sync_queue_key(queue, labels, to);
                }
            }
        }
    }

    // Memory tailing trades reuse of the per-node buffers for a tight
    // high-water mark between queries.
    if watt_core::Options::get().tail_memory {
        labels.shrink_to_fit();
    }

    labels.settled_at(target).to_vec()
}

// ── multi-criteria policy ─────────────────────────────────────────────────────

impl SearchPolicy for PairPolicy {
    type EdgeWeight = (Fixed, Fixed);

    fn seed(&self, _start: NodeId) -> PairLabel {
        PairLabel::start()
    }

    fn link(
        &self,
        label: &PairLabel,
        edge: &(Fixed, Fixed),
        node: NodeId,
        entry: u32,
    ) -> Option<PairLabel> {
        let mut duration = label.duration.saturating_add(edge.0);
        let mut consumption = label.consumption.saturating_add(edge.1);
        if self.constrain(&mut duration, &mut consumption) {
            return None;
        }
        Some(PairLabel {
            key: Fixed::ZERO,
            duration,
            consumption,
            parent: node,
            parent_entry: entry,
            charged_at: NodeId::INVALID,
        })
    }

    fn termination_slack(&self) -> Fixed {
        self.eps_x
    }

    fn wants_cleanup(&self) -> bool {
        true
    }
}

// ── query contexts ────────────────────────────────────────────────────────────

/// Multi-criteria search with plain Dijkstra ordering.
pub struct McDijkstraContext {
    pub policy: PairPolicy,
    queue: MinIdQueue,
    labels: NodeLabels<PairLabel>,
    potentials: ZeroPotentials,
}

impl McDijkstraContext {
    pub fn new(eps_x: f64, eps_y: f64, capacity: f64, num_nodes: usize) -> Self {
        Self {
            policy: PairPolicy::new(
                Fixed::from_f64(eps_x),
                Fixed::from_f64(eps_y),
                Fixed::from_f64(capacity),
            ),
            queue: MinIdQueue::new(num_nodes),
            labels: NodeLabels::new(num_nodes),
            potentials: ZeroPotentials,
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

/// Multi-criteria search with landmark (ALT) goal direction.
pub struct McAStarContext {
    pub policy: PairPolicy,
    queue: MinIdQueue,
    labels: NodeLabels<PairLabel>,
    potentials: LandmarkPotentials,
}

impl McAStarContext {
    pub fn new(eps_x: f64, eps_y: f64, capacity: f64, potentials: LandmarkPotentials, num_nodes: usize) -> Self {
        Self {
            policy: PairPolicy::new(
                Fixed::from_f64(eps_x),
                Fixed::from_f64(eps_y),
                Fixed::from_f64(capacity),
            ),
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

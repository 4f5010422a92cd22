//! Per-node label lists.
//!
//! Labels for a node are split into two lists:
//!
//! 1. *unsettled* — inserted via `push()` but not yet removed via `pop()`,
//!    held as a binary heap ordered by key;
//! 2. *settled* — moved here by `pop()`, append-only.
//!
//! The invariants:
//!
//! 1. the minimal unsettled label is dominated by no other unsettled label;
//! 2. the minimal unsettled label is not dominated by any settled label on
//!    its current domain.
//!
//! The first holds because the heap only surfaces undominated labels as the
//! minimum; the second is re-established by `ensure_undominated_minimum`
//! every time the minimum changes (push or pop).  For functional costs the
//! settled check may *clip* the minimum's domain instead of discarding it;
//! the clipped label gets a recomputed key and sifts back down if its key
//! grew.

use watt_core::{stats, Fixed, NodeId, StatsEvent};

use crate::policy::{DominancePolicy, SearchLabel};
use crate::potential::NodePotentials;

// ── label heap helpers ────────────────────────────────────────────────────────

fn sift_up<L: SearchLabel>(heap: &mut [L], mut slot: usize) {
    while slot > 0 {
        let parent = (slot - 1) / 2;
        if heap[parent].key() <= heap[slot].key() {
            break;
        }
        heap.swap(slot, parent);
        slot = parent;
    }
}

fn sift_down<L: SearchLabel>(heap: &mut [L], mut slot: usize) {
    loop {
        let left = 2 * slot + 1;
        if left >= heap.len() {
            break;
        }
        let right = left + 1;
        let smallest =
            if right < heap.len() && heap[right].key() < heap[left].key() { right } else { left };
        if heap[slot].key() <= heap[smallest].key() {
            break;
        }
        heap.swap(slot, smallest);
        slot = smallest;
    }
}

fn rebuild<L: SearchLabel>(heap: &mut [L]) {
    for slot in (0..heap.len() / 2).rev() {
        sift_down(heap, slot);
    }
}

/// Move the heap minimum to the back (pre-removal position).
fn pop_to_back<L: SearchLabel>(heap: &mut [L]) {
    let last = heap.len() - 1;
    heap.swap(0, last);
    sift_down(&mut heap[..last], 0);
}

// ── container ─────────────────────────────────────────────────────────────────

/// Unsettled and settled label lists for every node.
pub struct NodeLabels<L> {
    pub unsettled: Vec<Vec<L>>,
    pub settled: Vec<Vec<L>>,
}

impl<L: SearchLabel> NodeLabels<L> {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            unsettled: (0..num_nodes).map(|_| Vec::new()).collect(),
            settled: (0..num_nodes).map(|_| Vec::new()).collect(),
        }
    }

    /// Discard all labels, keeping the allocations per node.
    pub fn clear(&mut self) {
        for list in &mut self.unsettled {
            list.clear();
        }
        for list in &mut self.settled {
            list.clear();
        }
    }

    pub fn shrink_to_fit(&mut self) {
        for list in &mut self.unsettled {
            list.shrink_to_fit();
        }
        for list in &mut self.settled {
            list.shrink_to_fit();
        }
    }

    #[inline]
    pub fn empty(&self, node: NodeId) -> bool {
        self.unsettled[node.index()].is_empty()
    }

    #[inline]
    pub fn size(&self, node: NodeId) -> usize {
        self.unsettled[node.index()].len()
    }

    /// The minimal unsettled label.
    #[inline]
    pub fn min(&self, node: NodeId) -> &L {
        &self.unsettled[node.index()][0]
    }

    /// Settled labels of a node.
    #[inline]
    pub fn settled_at(&self, node: NodeId) -> &[L] {
        &self.settled[node.index()]
    }

    /// Insert a label; returns whether the node's minimum key changed.
    pub fn push<P, N>(&mut self, node: NodeId, label: L, policy: &P, potentials: &N) -> bool
    where
        P: DominancePolicy<Label = L>,
        N: NodePotentials,
    {
        stats::count(StatsEvent::LabelPush);

        let unsettled = &mut self.unsettled[node.index()];

        let mut modified_min = true;
        if !unsettled.is_empty() {
            let old_key = unsettled[0].key();
            if policy.dominates(&unsettled[0], &label) {
                modified_min = false;
            } else {
                unsettled.push(label);
                let last = unsettled.len() - 1;
                sift_up(unsettled, last);
                modified_min = unsettled[0].key() != old_key;
            }
        } else {
            unsettled.push(label);
        }

        if modified_min {
            self.ensure_undominated_minimum(node, policy, potentials);
        }

        modified_min
    }

    /// `true` if `label` is dominated by any settled label at `node`.
    pub fn dominated<P>(&self, node: NodeId, label: &L, policy: &P) -> bool
    where
        P: DominancePolicy<Label = L>,
    {
        policy.dominated_by(&self.settled[node.index()], label)
    }

    /// Settle the minimal label; returns it with its settled-entry index.
    pub fn pop<P, N>(&mut self, node: NodeId, policy: &P, potentials: &N) -> (L, u32)
    where
        P: DominancePolicy<Label = L>,
        N: NodePotentials,
    {
        stats::count(StatsEvent::LabelPop);

        let unsettled = &mut self.unsettled[node.index()];
        debug_assert!(!unsettled.is_empty());
        pop_to_back(unsettled);
        let Some(label) = unsettled.pop() else {
            unreachable!("pop on a node without unsettled labels");
        };

        let settled = &mut self.settled[node.index()];
        let entry = settled.len() as u32;
        settled.push(label.clone());
        stats::max(StatsEvent::LabelMaxSettled, settled.len() as u64);

        self.ensure_undominated_minimum(node, policy, potentials);

        (label, entry)
    }

    /// Replace the unsettled heap with its Pareto front (multi-criteria
    /// searches only — bounds label-list growth for point costs).
    pub fn cleanup_unsettled<P>(&mut self, node: NodeId, policy: &P)
    where
        P: DominancePolicy<Label = L>,
    {
        let unsettled = &mut self.unsettled[node.index()];
        let before = unsettled.len();
        policy.cleanup(unsettled);
        if unsettled.len() != before {
            stats::count(StatsEvent::LabelCleanup);
            rebuild(unsettled);
        }
    }

    /// Re-establish invariant 2 for the current minimum.
    ///
    /// While the minimum might still be dominated: clip it against the
    /// settled list.  Fully dominated minima are dropped; clipped minima get
    /// a recomputed key and sift back into place when their key grew.
    fn ensure_undominated_minimum<P, N>(&mut self, node: NodeId, policy: &P, potentials: &N)
    where
        P: DominancePolicy<Label = L>,
        N: NodePotentials,
    {
        let settled = &self.settled[node.index()];
        let unsettled = &mut self.unsettled[node.index()];

        let mut modified_min = true;
        while !unsettled.is_empty() && modified_min {
            let old_key = unsettled[0].key();
            let (is_dominated, was_modified) = policy.clip_dominated(settled, &mut unsettled[0]);

            if is_dominated {
                modified_min = true;
            } else if was_modified {
                let head = &mut unsettled[0];
                let new_key = potentials.key(node, policy.cost_key(head));
                head.set_key(new_key);
                modified_min = new_key > old_key;
            } else {
                modified_min = false;
            }

            if modified_min {
                pop_to_back(unsettled);
                if is_dominated {
                    unsettled.pop();
                } else {
                    let last = unsettled.len() - 1;
                    sift_up(unsettled, last);
                }
            }
        }

        stats::max(StatsEvent::LabelMaxUnsettled, unsettled.len() as u64);
    }
}

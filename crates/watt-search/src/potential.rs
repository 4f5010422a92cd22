//! Node potentials for goal direction (A*).
//!
//! A potential `h(v)` is added to every label key.  Correctness of the
//! label-setting searches needs `h` admissible (`h(v) ≤ d(v, target)`) and
//! consistent; both searches then terminate against keys that are true
//! lower bounds on any completion.

use std::cell::RefCell;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use watt_core::{Fixed, NodeId};
use watt_graph::DurationGraph;

use crate::dijkstra::one_to_all;
use crate::queue::MinIdQueue;

/// Key provider interface shared by all searches.
pub trait NodePotentials {
    /// Called once per query before the search starts.
    fn recompute(&mut self, queue: &mut MinIdQueue, target: NodeId);

    /// `h(node)`; must be admissible w.r.t. the current target.
    fn potential(&self, node: NodeId) -> Fixed;

    /// Key of a label at `node` with the given cost lower bound.
    #[inline]
    fn key(&self, node: NodeId, cost_key: Fixed) -> Fixed {
        cost_key.saturating_add(self.potential(node))
    }
}

// ── zero ──────────────────────────────────────────────────────────────────────

/// `h(v) = 0`: plain Dijkstra ordering.
pub struct ZeroPotentials;

impl NodePotentials for ZeroPotentials {
    fn recompute(&mut self, _queue: &mut MinIdQueue, _target: NodeId) {}

    #[inline]
    fn potential(&self, _node: NodeId) -> Fixed {
        Fixed::ZERO
    }
}

// ── landmarks (ALT) ───────────────────────────────────────────────────────────

/// Landmark (ALT) potentials.
///
/// Construction picks landmark nodes and precomputes, per landmark, the
/// shortest duration from the landmark to every node *on the reverse
/// graph* — i.e. the forward distance from every node to the landmark.
/// Per query, `h(v) = max_ℓ |d(ℓ, target) − d(ℓ, v)|` is evaluated lazily
/// on first use of `v` and cached until the next `recompute`.
pub struct LandmarkPotentials {
    /// Per landmark: distance to every node on the reverse graph.
    distances: Vec<Vec<Fixed>>,
    target: NodeId,
    generation: u32,
    cache: RefCell<Vec<(u32, Fixed)>>,
}

impl LandmarkPotentials {
    pub const DEFAULT_LANDMARKS: usize = 8;

    /// Pick `num_landmarks` distinct random nodes and run one full sweep
    /// from each, in parallel.
    pub fn new(reverse_graph: &DurationGraph, num_landmarks: usize, seed: u64) -> Self {
        let num_nodes = reverse_graph.num_nodes();
        let mut rng = SmallRng::seed_from_u64(seed);

        let mut landmarks: Vec<NodeId> = Vec::new();
        while landmarks.len() < num_landmarks.min(num_nodes) {
            let candidate = NodeId(rng.gen_range(0..num_nodes as u32));
            if !landmarks.contains(&candidate) {
                landmarks.push(candidate);
            }
        }

        let distances = landmarks
            .par_iter()
            .map(|&landmark| one_to_all(reverse_graph, landmark))
            .collect();

        Self {
            distances,
            target: NodeId::INVALID,
            generation: 0,
            cache: RefCell::new(vec![(0, Fixed::ZERO); num_nodes]),
        }
    }
}

impl NodePotentials for LandmarkPotentials {
    fn recompute(&mut self, _queue: &mut MinIdQueue, target: NodeId) {
        self.target = target;
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: stamped entries from generation 0 would read as
            // fresh, so invalidate explicitly.
            self.cache.borrow_mut().fill((0, Fixed::ZERO));
            self.generation = 1;
        }
    }

    fn potential(&self, node: NodeId) -> Fixed {
        if self.target == NodeId::INVALID {
            return Fixed::ZERO;
        }

        let mut cache = self.cache.borrow_mut();
        let (stamp, cached) = cache[node.index()];
        if stamp == self.generation {
            return cached;
        }

        let mut best = Fixed::ZERO;
        for distances in &self.distances {
            let to_target = distances[self.target.index()];
            let to_node = distances[node.index()];
            if to_target.is_inf() || to_node.is_inf() {
                continue;
            }
            let diff = Fixed((to_target.0 - to_node.0).abs());
            best = best.max(diff);
        }

        cache[node.index()] = (self.generation, best);
        best
    }
}

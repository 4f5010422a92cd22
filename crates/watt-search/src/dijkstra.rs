//! Scalar shortest-path searches on duration graphs.
//!
//! The unidirectional search doubles as the landmark preprocessing sweep;
//! the bidirectional variant answers the plain `fastest_bi_dijkstra`
//! queries, alternating between a forward search on the graph and a
//! backward search on its reverse until the frontiers prove the meeting
//! point optimal.

use watt_core::{stats, Fixed, NodeId, StatsEvent};
use watt_graph::DurationGraph;

use crate::queue::{IdKeyPair, MinIdQueue};

/// One full Dijkstra sweep; returns the distance array (`INF` unreachable).
pub fn one_to_all(graph: &DurationGraph, source: NodeId) -> Vec<Fixed> {
    let mut queue = MinIdQueue::new(graph.num_nodes());
    let mut dist = vec![Fixed::INF; graph.num_nodes()];

    dist[source.index()] = Fixed::ZERO;
    queue.push(IdKeyPair { id: source.0, key: Fixed::ZERO });

    while let Some(IdKeyPair { id, key }) = queue.pop() {
        let node = NodeId(id);
        for (edge, to) in graph.edges(node) {
            stats::count(StatsEvent::DijkstraRelax);
            let tentative = key.saturating_add(*graph.weight(edge));
            if tentative < dist[to.index()] {
                dist[to.index()] = tentative;
                if queue.contains_id(to.0) {
                    queue.decrease_key(IdKeyPair { id: to.0, key: tentative });
                } else {
                    queue.push(IdKeyPair { id: to.0, key: tentative });
                }
            }
        }
    }

    dist
}

// ── one-to-one with parents ───────────────────────────────────────────────────

/// Reusable scalar search state.
pub struct ScalarDijkstra {
    queue: MinIdQueue,
    dist: Vec<Fixed>,
    parent: Vec<NodeId>,
}

impl ScalarDijkstra {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            queue: MinIdQueue::new(num_nodes),
            dist: vec![Fixed::INF; num_nodes],
            parent: vec![NodeId::INVALID; num_nodes],
        }
    }

    /// Shortest duration and node path from `source` to `target`.
    pub fn run(
        &mut self,
        graph: &DurationGraph,
        source: NodeId,
        target: NodeId,
    ) -> Option<(Fixed, Vec<NodeId>)> {
        self.queue.clear();
        self.dist.fill(Fixed::INF);
        self.parent.fill(NodeId::INVALID);

        self.dist[source.index()] = Fixed::ZERO;
        self.queue.push(IdKeyPair { id: source.0, key: Fixed::ZERO });

        while let Some(IdKeyPair { id, key }) = self.queue.pop() {
            let node = NodeId(id);
            if node == target {
                break;
            }
            for (edge, to) in graph.edges(node) {
                stats::count(StatsEvent::DijkstraRelax);
                let tentative = key.saturating_add(*graph.weight(edge));
                if tentative < self.dist[to.index()] {
                    self.dist[to.index()] = tentative;
                    self.parent[to.index()] = node;
                    if self.queue.contains_id(to.0) {
                        self.queue.decrease_key(IdKeyPair { id: to.0, key: tentative });
                    } else {
                        self.queue.push(IdKeyPair { id: to.0, key: tentative });
                    }
                }
            }
        }

        let cost = self.dist[target.index()];
        if cost.is_inf() {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while current != source {
            current = self.parent[current.index()];
            path.push(current);
        }
        path.reverse();
        Some((cost, path))
    }
}

// ── bidirectional ─────────────────────────────────────────────────────────────

/// Bidirectional fastest-path search.
///
/// Forward search on the graph, backward search on the reverse graph,
/// always advancing the cheaper frontier.  Terminates once the sum of the
/// two frontier keys reaches the best meeting cost.
pub struct BiDijkstra {
    fwd: ScalarHalf,
    bwd: ScalarHalf,
}

struct ScalarHalf {
    queue: MinIdQueue,
    dist: Vec<Fixed>,
    parent: Vec<NodeId>,
}

impl ScalarHalf {
    fn new(num_nodes: usize) -> Self {
        Self {
            queue: MinIdQueue::new(num_nodes),
            dist: vec![Fixed::INF; num_nodes],
            parent: vec![NodeId::INVALID; num_nodes],
        }
    }

    fn reset(&mut self, source: NodeId) {
        self.queue.clear();
        self.dist.fill(Fixed::INF);
        self.parent.fill(NodeId::INVALID);
        self.dist[source.index()] = Fixed::ZERO;
        self.queue.push(IdKeyPair { id: source.0, key: Fixed::ZERO });
    }

    /// Settle one node; returns it, updating the best meeting point against
    /// the opposite half.
    fn step(
        &mut self,
        graph: &DurationGraph,
        other: &ScalarHalf,
        best: &mut Fixed,
        meet: &mut NodeId,
    ) {
        let Some(IdKeyPair { id, key }) = self.queue.pop() else {
            return;
        };
        let node = NodeId(id);

        let other_dist = other.dist[node.index()];
        let through = key.saturating_add(other_dist);
        if through < *best {
            *best = through;
            *meet = node;
        }

        for (edge, to) in graph.edges(node) {
            stats::count(StatsEvent::DijkstraRelax);
            let tentative = key.saturating_add(*graph.weight(edge));
            if tentative < self.dist[to.index()] {
                self.dist[to.index()] = tentative;
                self.parent[to.index()] = node;
                if self.queue.contains_id(to.0) {
                    self.queue.decrease_key(IdKeyPair { id: to.0, key: tentative });
                } else {
                    self.queue.push(IdKeyPair { id: to.0, key: tentative });
                }
            }
        }
    }
}

impl BiDijkstra {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            fwd: ScalarHalf::new(num_nodes),
            bwd: ScalarHalf::new(num_nodes),
        }
    }

    /// Fastest duration and node path from `source` to `target`.
    ///
    /// `reverse_graph` must be `graph.invert()`.
    pub fn run(
        &mut self,
        graph: &DurationGraph,
        reverse_graph: &DurationGraph,
        source: NodeId,
        target: NodeId,
    ) -> Option<(Fixed, Vec<NodeId>)> {
        if source == target {
            return Some((Fixed::ZERO, vec![source]));
        }

        self.fwd.reset(source);
        self.bwd.reset(target);

        let mut best = Fixed::INF;
        let mut meet = NodeId::INVALID;

        loop {
            let fwd_key = self.fwd.queue.peek().map(|e| e.key);
            let bwd_key = self.bwd.queue.peek().map(|e| e.key);

            match (fwd_key, bwd_key) {
                (None, None) => break,
                (Some(f), Some(b)) => {
                    if f.saturating_add(b) >= best {
                        break;
                    }
                    if f <= b {
                        self.fwd.step(graph, &self.bwd, &mut best, &mut meet);
                    } else {
                        self.bwd.step(reverse_graph, &self.fwd, &mut best, &mut meet);
                    }
                }
                (Some(f), None) => {
                    if f >= best {
                        break;
                    }
                    self.fwd.step(graph, &self.bwd, &mut best, &mut meet);
                }
                (None, Some(b)) => {
                    if b >= best {
                        break;
                    }
                    self.bwd.step(reverse_graph, &self.fwd, &mut best, &mut meet);
                }
            }
        }

        if best.is_inf() {
            return None;
        }

        // Forward half: meet back to source.
        let mut path = vec![meet];
        let mut current = meet;
        while current != source {
            current = self.fwd.parent[current.index()];
            path.push(current);
        }
        path.reverse();

        // Backward half: meet forward to target (parents live in the
        // reverse graph, so they are successors on the forward graph).
        let mut current = meet;
        while current != target {
            current = self.bwd.parent[current.index()];
            path.push(current);
        }

        Some((best, path))
    }
}

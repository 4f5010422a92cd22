//! Static graph in Compressed Sparse Row format.
//!
//! # Data layout
//!
//! Outgoing edges of node `u` occupy the index range
//! `first_out[u] .. first_out[u+1]` of the `head`/`weight` arrays, sorted by
//! head node.  Iterating a node's edges is a contiguous memory scan and
//! `edge(u, v)` is a binary search over that range.  Parallel edges are
//! allowed (the sampled consumption graph uses them); `edge(u, v)` then
//! returns the first.
//!
//! The graph is immutable after construction — preprocessing that needs
//! mutation goes through [`crate::dynamic::DynamicGraph`].

use watt_core::{EdgeId, NodeId};

use crate::error::{GraphError, GraphResult};

/// An edge for bulk construction.
#[derive(Clone, Debug)]
pub struct Edge<W> {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: W,
}

impl<W> Edge<W> {
    pub fn new(from: NodeId, to: NodeId, weight: W) -> Self {
        Self { from, to, weight }
    }
}

/// Directed graph in CSR form.
#[derive(Clone, Debug)]
pub struct CsrGraph<W> {
    first_out: Vec<u32>,
    head: Vec<NodeId>,
    weight: Vec<W>,
}

impl<W> CsrGraph<W> {
    /// Assemble from raw CSR arrays, validating the invariants.
    pub fn from_parts(first_out: Vec<u32>, head: Vec<NodeId>, weight: Vec<W>) -> GraphResult<Self> {
        if first_out.first() != Some(&0) {
            return Err(GraphError::Malformed("first_out must start at 0".into()));
        }
        if first_out.last().copied().unwrap_or(0) as usize != head.len() {
            return Err(GraphError::Malformed("first_out must end at the edge count".into()));
        }
        if head.len() != weight.len() {
            return Err(GraphError::Malformed("head and weight lengths differ".into()));
        }
        if first_out.windows(2).any(|w| w[0] > w[1]) {
            return Err(GraphError::Malformed("first_out must be non-decreasing".into()));
        }
        Ok(Self { first_out, head, weight })
    }

    /// Build from an unsorted edge list.
    pub fn from_edges(num_nodes: usize, mut edges: Vec<Edge<W>>) -> Self {
        edges.sort_by(|lhs, rhs| (lhs.from, lhs.to).cmp(&(rhs.from, rhs.to)));

        let mut first_out = vec![0u32; num_nodes + 1];
        for edge in &edges {
            first_out[edge.from.index() + 1] += 1;
        }
        for i in 1..=num_nodes {
            first_out[i] += first_out[i - 1];
        }

        let mut head = Vec::with_capacity(edges.len());
        let mut weight = Vec::with_capacity(edges.len());
        for edge in edges {
            head.push(edge.to);
            weight.push(edge.weight);
        }

        Self { first_out, head, weight }
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.first_out.len() - 1
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.head.len()
    }

    #[inline]
    fn out_range(&self, node: NodeId) -> std::ops::Range<usize> {
        self.first_out[node.index()] as usize..self.first_out[node.index() + 1] as usize
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.out_range(node).len()
    }

    /// Iterator over `(edge, head)` pairs of a node's outgoing edges.
    #[inline]
    pub fn edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId)> + '_ {
        self.out_range(node).map(|i| (EdgeId(i as u32), self.head[i]))
    }

    #[inline]
    pub fn target(&self, edge: EdgeId) -> NodeId {
        self.head[edge.index()]
    }

    #[inline]
    pub fn weight(&self, edge: EdgeId) -> &W {
        &self.weight[edge.index()]
    }

    /// Find the (first) edge `from → to` by binary search.
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        let range = self.out_range(from);
        let slice = &self.head[range.clone()];
        let offset = slice.partition_point(|&h| h < to);
        if offset < slice.len() && slice[offset] == to {
            Some(EdgeId((range.start + offset) as u32))
        } else {
            None
        }
    }

    /// All edges as `(from, to, &weight)` triples, in CSR order.
    pub fn edge_list(&self) -> impl Iterator<Item = (NodeId, NodeId, &W)> + '_ {
        (0..self.num_nodes()).flat_map(move |u| {
            let node = NodeId(u as u32);
            self.out_range(node)
                .map(move |i| (node, self.head[i], &self.weight[i]))
        })
    }

    /// Borrow the raw CSR arrays (used by the on-disk format).
    pub fn parts(&self) -> (&[u32], &[NodeId], &[W]) {
        (&self.first_out, &self.head, &self.weight)
    }

    /// Apply `f` to every weight, keeping the topology.
    pub fn map_weights<U>(&self, f: impl Fn(&W) -> U) -> CsrGraph<U> {
        CsrGraph {
            first_out: self.first_out.clone(),
            head: self.head.clone(),
            weight: self.weight.iter().map(f).collect(),
        }
    }
}

impl<W: Clone> CsrGraph<W> {
    /// The reverse graph: an edge `u → v` for every `v → u` of `self`.
    pub fn invert(&self) -> CsrGraph<W> {
        let mut edges = Vec::with_capacity(self.num_edges());
        for (from, to, weight) in self.edge_list() {
            edges.push(Edge::new(to, from, weight.clone()));
        }
        CsrGraph::from_edges(self.num_nodes(), edges)
    }
}

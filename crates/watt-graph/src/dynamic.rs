//! Mutable adjacency-list graph for preprocessing.
//!
//! Supports edge insertion and removal; queries always run on the immutable
//! CSR form obtained via [`DynamicGraph::to_csr`].

use watt_core::NodeId;

use crate::csr::{CsrGraph, Edge};

/// A mutable directed graph.
#[derive(Clone, Debug, Default)]
pub struct DynamicGraph<W> {
    adjacency: Vec<Vec<(NodeId, W)>>,
}

impl<W> DynamicGraph<W> {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            adjacency: (0..num_nodes).map(|_| Vec::new()).collect(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Append a node and return its id.
    pub fn add_node(&mut self) -> NodeId {
        self.adjacency.push(Vec::new());
        NodeId((self.adjacency.len() - 1) as u32)
    }

    pub fn insert_edge(&mut self, from: NodeId, to: NodeId, weight: W) {
        self.adjacency[from.index()].push((to, weight));
    }

    /// Remove the first edge `from → to`; `true` if one existed.
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        let list = &mut self.adjacency[from.index()];
        match list.iter().position(|(head, _)| *head == to) {
            Some(pos) => {
                list.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency[node.index()].len()
    }

    /// Freeze into CSR form.
    pub fn to_csr(self) -> CsrGraph<W> {
        let num_nodes = self.adjacency.len();
        let mut edges = Vec::new();
        for (from, list) in self.adjacency.into_iter().enumerate() {
            for (to, weight) in list {
                edges.push(Edge::new(NodeId(from as u32), to, weight));
            }
        }
        CsrGraph::from_edges(num_nodes, edges)
    }
}

//! Nearest-node spatial index.
//!
//! An R-tree over node coordinates, used to snap query coordinates to graph
//! nodes (`/nearest` and the charger import).  Distances are squared
//! euclidean in fixed-point degree space — sufficient for snapping within a
//! road network's extent.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use watt_core::{Coordinate, NodeId};

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lon, lat] in fixed-point units
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlon = self.point[0] - point[0];
        let dlat = self.point[1] - point[1];
        dlon * dlon + dlat * dlat
    }
}

/// Immutable nearest-neighbour index over node coordinates.
pub struct NearestIndex {
    tree: RTree<NodeEntry>,
}

impl NearestIndex {
    /// Bulk-load the index; O(n log n).
    pub fn new(coordinates: &[Coordinate]) -> Self {
        let entries = coordinates
            .iter()
            .enumerate()
            .map(|(i, c)| NodeEntry {
                point: [c.lon as f64, c.lat as f64],
                id: NodeId(i as u32),
            })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    /// The node closest to `coordinate`; `None` only for an empty index.
    pub fn nearest(&self, coordinate: Coordinate) -> Option<NodeId> {
        self.tree
            .nearest_neighbor(&[coordinate.lon as f64, coordinate.lat as f64])
            .map(|entry| entry.id)
    }
}

//! KD-tree index used to snap arbitrary coordinates onto graph nodes.
//!
//! Coordinates are projected onto the unit sphere, so the nearest point by
//! chord length is also the nearest by great-circle distance.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;

use crate::coord::Coordinate;
use crate::network::NodeId;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Mean Earth radius in kilometres, matching the haversine distances.
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Nearest-neighbour index over a fixed set of nodes.
pub(crate) struct SpatialIndex {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    ids: Vec<NodeId>,
}

impl SpatialIndex {
    /// Index the given nodes. Insertion order decides between exact ties.
    pub(crate) fn build<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, Coordinate)>,
    {
        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        let mut ids = Vec::new();
        for (id, coordinate) in points {
            tree.add(&coordinate.unit_vector(), ids.len());
            ids.push(id);
        }
        Self { tree, ids }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    /// Closest indexed node and its great-circle distance in kilometres.
    pub(crate) fn nearest(&self, coordinate: &Coordinate) -> Option<(NodeId, f64)> {
        self.nearest_n(coordinate, 1).into_iter().next()
    }

    /// Up to `k` closest nodes, sorted by distance.
    pub(crate) fn nearest_n(&self, coordinate: &Coordinate, k: usize) -> Vec<(NodeId, f64)> {
        if k == 0 || self.ids.is_empty() {
            return Vec::new();
        }
        self.tree
            .nearest_n::<SquaredEuclidean>(&coordinate.unit_vector(), k)
            .into_iter()
            .map(|n| (self.ids[n.item], chord_to_km(n.distance)))
            .collect()
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("node_count", &self.ids.len())
            .finish()
    }
}

/// Convert a squared chord length on the unit sphere to kilometres along the
/// surface.
fn chord_to_km(squared_chord: f64) -> f64 {
    let chord = squared_chord.max(0.0).sqrt().min(2.0);
    2.0 * (chord / 2.0).asin() * EARTH_RADIUS_KM
}

use crate::graph::{LaneGraph, NodeId};
use geo::Coord;
use ordered_float::OrderedFloat;
use rstar::RTree;
use rstar::primitives::GeomWithData;

pub type IndexedNode = GeomWithData<[f64; 2], NodeId>;

/// Snaps lane endpoints onto canonical graph nodes.
///
/// Positions are indexed in raw lon/lat degrees. A query resolves to the
/// closest existing node strictly within `tolerance`; exact distance ties go
/// to the node that was created first.
pub struct NodeRegistry {
    tree: RTree<IndexedNode>,
    tolerance: f64,
}

impl NodeRegistry {
    pub fn new(tolerance_deg: f64) -> Self {
        Self {
            tree: RTree::new(),
            tolerance: tolerance_deg,
        }
    }

    /// Closest registered node strictly inside the tolerance, if any.
    pub fn find_node(&self, pos: Coord) -> Option<NodeId> {
        let tol_sq = self.tolerance * self.tolerance;
        self.tree
            .locate_within_distance([pos.x, pos.y], tol_sq)
            .filter_map(|candidate| {
                let [x, y] = *candidate.geom();
                let dist_sq = (pos.x - x) * (pos.x - x) + (pos.y - y) * (pos.y - y);
                (dist_sq < tol_sq).then_some((OrderedFloat(dist_sq), candidate.data))
            })
            .min()
            .map(|(_, id)| id)
    }

    pub fn find_or_create_node(&mut self, graph: &mut LaneGraph, pos: Coord) -> NodeId {
        if let Some(existing) = self.find_node(pos) {
            return existing;
        }
        let id = graph.add_nd(pos.x, pos.y);
        self.tree.insert(GeomWithData::new([pos.x, pos.y], id));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_resolves_to_same_node() {
        let mut graph = LaneGraph::new();
        let mut registry = NodeRegistry::new(0.2);

        let a = registry.find_or_create_node(&mut graph, Coord { x: 12.5, y: 55.5 });
        let b = registry.find_or_create_node(&mut graph, Coord { x: 12.5, y: 55.5 });

        assert_eq!(a, b);
        assert_eq!(graph.num_nodes(), 1);
    }

    #[test]
    fn test_tolerance_boundary_is_exclusive() {
        let mut graph = LaneGraph::new();
        let mut registry = NodeRegistry::new(0.2);

        let origin = registry.find_or_create_node(&mut graph, Coord { x: 0.0, y: 0.0 });
        let at_tolerance = registry.find_or_create_node(&mut graph, Coord { x: 0.2, y: 0.0 });
        assert_ne!(origin, at_tolerance, "points exactly one tolerance apart must not merge");

        let just_inside = registry.find_or_create_node(&mut graph, Coord { x: 0.0, y: -(0.2 - 1e-9) });
        assert_eq!(origin, just_inside, "points just inside the tolerance must merge");
        assert_eq!(graph.num_nodes(), 2);
    }

    #[test]
    fn test_closest_candidate_wins() {
        let mut graph = LaneGraph::new();
        let mut registry = NodeRegistry::new(0.5);

        let far = registry.find_or_create_node(&mut graph, Coord { x: 0.0, y: 0.0 });
        // 0.6 away from the first node, so it gets its own id
        let near = registry.find_or_create_node(&mut graph, Coord { x: 0.6, y: 0.0 });

        assert_eq!(registry.find_node(Coord { x: 0.4, y: 0.0 }), Some(near));
        assert_eq!(registry.find_node(Coord { x: 0.2, y: 0.0 }), Some(far));
    }

    #[test]
    fn test_exact_tie_goes_to_first_created() {
        let mut graph = LaneGraph::new();
        let mut registry = NodeRegistry::new(0.5);

        let first = registry.find_or_create_node(&mut graph, Coord { x: -0.3, y: 0.0 });
        let second = registry.find_or_create_node(&mut graph, Coord { x: 0.3, y: 0.0 });
        assert_ne!(first, second);

        assert_eq!(registry.find_node(Coord { x: 0.0, y: 0.0 }), Some(first));
    }
}

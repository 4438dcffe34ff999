// ===========================================================================
// Arena-backed undirected multigraph of lane nodes and edges
// ===========================================================================
use ahash::AHashSet;
use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stable index of a node in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaneNode {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

impl LaneNode {
    pub fn coord(&self) -> Coord {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LaneEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub length_km: f64,
    /// (lon, lat) polyline in source-to-target order
    pub polyline: LineString,
    pub chokepoints: BTreeSet<String>,
    pub lane_id: String,
    /// Created by dead-end repair rather than read from lane geometry
    pub synthetic: bool,
}

impl LaneEdge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.source, self.target, &self.lane_id)
    }

    pub fn other_end(&self, n: NodeId) -> NodeId {
        if self.source == n { self.target } else { self.source }
    }
}

/// Identity of an edge: unordered node pair plus lane id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub low: NodeId,
    pub high: NodeId,
    pub lane_id: String,
}

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId, lane_id: &str) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
            lane_id: lane_id.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct LaneGraph {
    nodes: Vec<LaneNode>,
    edges: Vec<LaneEdge>,
    // node index -> incident edge indices; a self-loop is listed twice
    adj_list: Vec<Vec<usize>>,
    edge_keys: AHashSet<EdgeKey>,
}

impl LaneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_nd(&mut self, lon: f64, lat: f64) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(LaneNode { id, lat, lon });
        self.adj_list.push(Vec::new());
        id
    }

    /// Add an edge. Returns `None` without touching the graph when an edge
    /// with the same key is already present or an endpoint is not a node.
    pub fn add_edg(&mut self, edge: LaneEdge) -> Option<usize> {
        if edge.source.0 >= self.nodes.len() || edge.target.0 >= self.nodes.len() {
            return None;
        }
        if !self.edge_keys.insert(edge.key()) {
            return None;
        }
        let idx = self.edges.len();
        self.adj_list[edge.source.0].push(idx);
        self.adj_list[edge.target.0].push(idx);
        self.edges.push(edge);
        Some(idx)
    }

    pub fn node(&self, id: NodeId) -> &LaneNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[LaneNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LaneEdge] {
        &self.edges
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Incident-edge count; self-loops count twice.
    pub fn get_deg(&self, n: NodeId) -> usize {
        self.adj_list[n.0].len()
    }

    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.adj_list[a.0]
            .iter()
            .any(|&e| self.edges[e].other_end(a) == b)
    }

    pub fn dead_ends(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|&n| self.get_deg(n) == 1)
            .collect()
    }

    /// Node count per degree.
    pub fn degree_histogram(&self) -> BTreeMap<usize, usize> {
        let mut hist = BTreeMap::new();
        for n in &self.nodes {
            *hist.entry(self.get_deg(n.id)).or_insert(0) += 1;
        }
        hist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: usize, b: usize, lane: &str) -> LaneEdge {
        LaneEdge {
            source: NodeId(a),
            target: NodeId(b),
            length_km: 1.0,
            polyline: LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]),
            chokepoints: BTreeSet::new(),
            lane_id: lane.to_string(),
            synthetic: false,
        }
    }

    #[test]
    fn test_multigraph_key_rejects_reversed_duplicate() {
        let mut g = LaneGraph::new();
        g.add_nd(0.0, 0.0);
        g.add_nd(1.0, 0.0);

        assert!(g.add_edg(edge(0, 1, "a")).is_some());
        assert!(g.add_edg(edge(1, 0, "a")).is_none(), "same pair and lane is a duplicate");
        assert!(g.add_edg(edge(1, 0, "b")).is_some(), "different lane is a parallel edge");

        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.get_deg(NodeId(0)), 2);
        assert!(g.are_adjacent(NodeId(0), NodeId(1)));
    }

    #[test]
    fn test_self_loop_counts_twice() {
        let mut g = LaneGraph::new();
        g.add_nd(0.0, 0.0);
        g.add_edg(edge(0, 0, "loop"));
        assert_eq!(g.get_deg(NodeId(0)), 2);
        assert!(g.dead_ends().is_empty());
    }

    #[test]
    fn test_edge_to_unknown_node_is_refused() {
        let mut g = LaneGraph::new();
        g.add_nd(0.0, 0.0);

        assert!(g.add_edg(edge(0, 3, "dangling")).is_none());
        assert_eq!(g.num_edges(), 0);
        assert_eq!(g.get_deg(NodeId(0)), 0);
        // the refused key is not remembered
        g.add_nd(1.0, 0.0);
        assert!(g.add_edg(edge(0, 1, "dangling")).is_some());
    }

    #[test]
    fn test_degree_histogram() {
        let mut g = LaneGraph::new();
        for i in 0..4 {
            g.add_nd(i as f64, 0.0);
        }
        g.add_edg(edge(0, 1, "a"));
        g.add_edg(edge(1, 2, "b"));

        let hist = g.degree_histogram();
        assert_eq!(hist.into_iter().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 1)]);
    }
}

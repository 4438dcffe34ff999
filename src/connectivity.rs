use crate::graph::{LaneGraph, NodeId};
use serde::Serialize;

/// Disjoint-set forest over node indices, path halving + union by size.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    pub fn from_graph(graph: &LaneGraph) -> Self {
        let mut uf = Self::new(graph.num_nodes());
        for edge in graph.edges() {
            uf.union(edge.source.0, edge.target.0);
        }
        uf
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Returns false when both were already in the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

/// Connected components, largest first. Equal sizes keep the order of their
/// lowest node id. Nodes inside a component are sorted.
pub fn connected_components(graph: &LaneGraph) -> Vec<Vec<NodeId>> {
    let n = graph.num_nodes();
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for edge in graph.edges() {
        adj[edge.source.0].push(edge.target.0);
        adj[edge.target.0].push(edge.source.0);
    }

    let mut visited = vec![false; n];
    let mut components = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(current) = stack.pop() {
            component.push(NodeId(current));
            for &next in &adj[current] {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
        component.sort();
        components.push(component);
    }

    // stable sort keeps discovery order (lowest first node) for equal sizes
    components.sort_by(|a, b| b.len().cmp(&a.len()));
    components
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConnectivitySummary {
    pub num_components: usize,
    pub largest_component: usize,
    /// Share of all nodes that sit in the largest component, 0..=1
    pub largest_share: f64,
    pub isolated_nodes: usize,
    /// Sizes of the ten largest components
    pub top_sizes: Vec<usize>,
}

pub fn summarize(graph: &LaneGraph) -> ConnectivitySummary {
    let components = connected_components(graph);
    let largest = components.first().map(Vec::len).unwrap_or(0);
    ConnectivitySummary {
        num_components: components.len(),
        largest_component: largest,
        largest_share: if graph.num_nodes() == 0 {
            0.0
        } else {
            largest as f64 / graph.num_nodes() as f64
        },
        isolated_nodes: graph
            .nodes()
            .iter()
            .filter(|n| graph.get_deg(n.id) == 0)
            .count(),
        top_sizes: components.iter().take(10).map(Vec::len).collect(),
    }
}

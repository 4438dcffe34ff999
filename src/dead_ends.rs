// ===========================================================================
// Dead-end repair: stitch degree-1 nodes to their nearest eligible node
// ===========================================================================
use crate::config::{DeadEndCandidates, GraphConfig, SyntheticLength};
use crate::connectivity::UnionFind;
use crate::coord_conversion::web_merc_length_km;
use crate::graph::{LaneEdge, LaneGraph, NodeId};
use crate::node_registry::IndexedNode;
use geo::LineString;
use log::{debug, info};
use rstar::RTree;
use rstar::primitives::GeomWithData;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadEndStats {
    pub dead_ends_found: usize,
    pub repaired: usize,
    /// No eligible partner inside the search radius
    pub unrepaired: usize,
}

fn repair_line(graph: &LaneGraph, u: NodeId, v: NodeId) -> LineString {
    LineString::from(vec![graph.node(u).coord(), graph.node(v).coord()])
}

/// Nearest eligible partner for `u`, if one lies strictly inside the radius.
///
/// Distances are squared degree distances. On exact ties the lowest node id
/// wins, matching a linear scan in node order. With `max_projected_km` set,
/// partners whose Web Mercator distance exceeds it are not eligible.
fn nearest_partner(
    graph: &LaneGraph,
    tree: &RTree<IndexedNode>,
    mut components: Option<&mut UnionFind>,
    u: NodeId,
    radius_sq: f64,
    max_projected_km: Option<f64>,
) -> Option<(f64, NodeId)> {
    let origin = graph.node(u).coord();
    let mut best: Option<(f64, NodeId)> = None;

    for (candidate, dist_sq) in tree.nearest_neighbor_iter_with_distance_2(&[origin.x, origin.y]) {
        if dist_sq >= radius_sq {
            break;
        }
        if let Some((best_dist, _)) = best {
            if dist_sq > best_dist {
                break;
            }
        }

        let v = candidate.data;
        if v == u || graph.are_adjacent(u, v) {
            continue;
        }
        if let Some(uf) = components.as_deref_mut() {
            if uf.connected(u.0, v.0) {
                continue;
            }
        }
        if let Some(limit) = max_projected_km {
            if web_merc_length_km(&repair_line(graph, u, v)) > limit {
                continue;
            }
        }

        match best {
            Some((_, best_id)) if best_id < v => {}
            _ => best = Some((dist_sq, v)),
        }
    }
    best
}

pub fn repair_dead_ends(graph: &mut LaneGraph, config: &GraphConfig) -> DeadEndStats {
    let dead_ends = graph.dead_ends();
    let mut stats = DeadEndStats {
        dead_ends_found: dead_ends.len(),
        ..DeadEndStats::default()
    };
    info!(
        "Found {} dead-end nodes (degree 1). Connecting to closest nodes...",
        dead_ends.len()
    );
    if dead_ends.is_empty() {
        return stats;
    }

    // node set is fixed from here on, only edges are added
    let tree = RTree::bulk_load(
        graph
            .nodes()
            .iter()
            .map(|n| GeomWithData::new([n.lon, n.lat], n.id))
            .collect(),
    );
    let mut components = match config.dead_end_candidates {
        DeadEndCandidates::OtherComponent => Some(UnionFind::from_graph(graph)),
        DeadEndCandidates::NonAdjacent => None,
    };
    let radius_sq = config.dead_end_search_radius_deg * config.dead_end_search_radius_deg;
    // projected lengths grow with latitude, so they are bounded separately
    let max_projected_km = match config.synthetic_length {
        SyntheticLength::Projected => Some(config.max_synthetic_length_km()),
        SyntheticLength::DegreeApprox => None,
    };

    for u in dead_ends {
        let Some((dist_sq, v)) = nearest_partner(
            graph,
            &tree,
            components.as_mut(),
            u,
            radius_sq,
            max_projected_km,
        ) else {
            debug!("Dead end {} has no partner within the search radius", u);
            stats.unrepaired += 1;
            continue;
        };

        let polyline = repair_line(graph, u, v);
        let length_km = match config.synthetic_length {
            SyntheticLength::DegreeApprox => dist_sq.sqrt() * config.degrees_to_km,
            SyntheticLength::Projected => web_merc_length_km(&polyline),
        };
        let edge = LaneEdge {
            source: u,
            target: v,
            length_km,
            polyline,
            chokepoints: BTreeSet::new(),
            lane_id: format!("fix_{}_{}", u, v),
            synthetic: true,
        };

        match graph.add_edg(edge) {
            Some(_) => {
                stats.repaired += 1;
                if let Some(uf) = components.as_mut() {
                    uf.union(u.0, v.0);
                }
            }
            None => stats.unrepaired += 1,
        }
    }

    info!(
        "Connected {} dead ends, {} left without a partner.",
        stats.repaired, stats.unrepaired
    );
    stats
}

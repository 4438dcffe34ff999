// ===========================================================================
// Port association: attach every port to its nearest lane node
// ===========================================================================
use crate::config::GraphConfig;
use crate::coord_conversion::lat_lng_to_web_merc;
use crate::graph::{LaneGraph, NodeId};
use crate::input::PortFeature;
use ahash::AHashSet;
use log::{debug, info, warn};
use rstar::RTree;
use rstar::primitives::GeomWithData;

#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub id: String,
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub node_id: NodeId,
    pub dist_to_node_km: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortStats {
    pub ports_seen: usize,
    pub mapped: usize,
    pub missing_coords: usize,
    pub invalid_coords: usize,
    /// Port id already taken by an earlier record
    pub duplicate_ids: usize,
    /// No node to attach to
    pub unassigned: usize,
    /// Nearest node beyond `max_port_offset_km`
    pub too_far: usize,
}

impl PortStats {
    pub fn dropped(&self) -> usize {
        self.ports_seen - self.mapped
    }
}

/// Web Mercator index of graph nodes, for nearest-node lookups.
pub struct NodeLocator {
    tree: RTree<GeomWithData<[f64; 2], NodeId>>,
}

impl NodeLocator {
    pub fn new(graph: &LaneGraph) -> Self {
        let entries = graph
            .nodes()
            .iter()
            .map(|n| {
                let (x, y) = lat_lng_to_web_merc(n.lon, n.lat);
                GeomWithData::new([x, y], n.id)
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Nearest node and its distance in km. Ties go to the lowest node id.
    pub fn nearest(&self, lon: f64, lat: f64) -> Option<(NodeId, f64)> {
        let (x, y) = lat_lng_to_web_merc(lon, lat);
        let mut best: Option<(f64, NodeId)> = None;
        for (candidate, dist_sq) in self.tree.nearest_neighbor_iter_with_distance_2(&[x, y]) {
            match best {
                Some((best_dist, _)) if dist_sq > best_dist => break,
                Some((_, best_id)) if best_id < candidate.data => {}
                _ => best = Some((dist_sq, candidate.data)),
            }
        }
        best.map(|(dist_sq, id)| (id, dist_sq.sqrt() / 1000.0))
    }
}

fn valid_coords(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

pub fn associate_ports(
    graph: &LaneGraph,
    records: &[PortFeature],
    config: &GraphConfig,
) -> (Vec<Port>, PortStats) {
    let locator = NodeLocator::new(graph);
    let mut stats = PortStats {
        ports_seen: records.len(),
        ..PortStats::default()
    };
    let mut seen_ids = AHashSet::new();
    let mut ports = Vec::with_capacity(records.len());

    for (row, record) in records.iter().enumerate() {
        let id = record.port_id.clone().unwrap_or_else(|| row.to_string());

        let (Some(lat), Some(lon)) = (record.lat, record.lon) else {
            debug!("Port {} has no coordinates", id);
            stats.missing_coords += 1;
            continue;
        };
        if !valid_coords(lat, lon) {
            debug!("Port {} has invalid coordinates ({}, {})", id, lat, lon);
            stats.invalid_coords += 1;
            continue;
        }
        if seen_ids.contains(&id) {
            debug!("Port id {} appears more than once, keeping the first", id);
            stats.duplicate_ids += 1;
            continue;
        }

        let Some((node_id, dist_to_node_km)) = locator.nearest(lon, lat) else {
            stats.unassigned += 1;
            continue;
        };
        if let Some(limit) = config.max_port_offset_km {
            if dist_to_node_km > limit {
                debug!("Port {} is {:.1} km from the network, dropping", id, dist_to_node_km);
                stats.too_far += 1;
                continue;
            }
        }

        seen_ids.insert(id.clone());
        ports.push(Port {
            name: record.name.clone().unwrap_or_else(|| format!("Port {}", id)),
            country: record.country.clone().unwrap_or_default(),
            id,
            lat,
            lon,
            node_id,
            dist_to_node_km,
        });
    }

    stats.mapped = ports.len();
    info!("Mapped {} ports to graph nodes.", stats.mapped);
    if stats.dropped() > 0 {
        warn!(
            "Dropped {} ports: {} missing coords, {} invalid coords, {} duplicate ids, {} unassigned, {} too far",
            stats.dropped(),
            stats.missing_coords,
            stats.invalid_coords,
            stats.duplicate_ids,
            stats.unassigned,
            stats.too_far
        );
    }
    (ports, stats)
}

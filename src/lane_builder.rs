// ===========================================================================
// Build the base lane graph: one edge per single-line lane part
// ===========================================================================
use crate::chokepoints::ChokepointRegistry;
use crate::config::GraphConfig;
use crate::coord_conversion::{line_to_web_merc, planar_length};
use crate::graph::{LaneEdge, LaneGraph};
use crate::input::LaneFeature;
use crate::lane_split::split_equal_length;
use crate::node_registry::NodeRegistry;
use geo::{Geometry, LineString};
use log::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaneBuildStats {
    pub lanes_seen: usize,
    pub parts_seen: usize,
    /// Missing geometry, no parts, or fewer than two coordinates
    pub empty_geometries: usize,
    /// Points, polygons and the like
    pub unsupported_geometries: usize,
    pub non_finite_geometries: usize,
    pub zero_length_parts: usize,
    pub duplicate_edges: usize,
    pub edges_added: usize,
}

pub struct LaneGraphBuilder<'a> {
    chokepoints: &'a ChokepointRegistry,
    split_count: usize,
    registry: NodeRegistry,
    graph: LaneGraph,
    stats: LaneBuildStats,
}

impl<'a> LaneGraphBuilder<'a> {
    pub fn new(config: &GraphConfig, chokepoints: &'a ChokepointRegistry) -> Self {
        Self {
            chokepoints,
            split_count: config.lane_split_count,
            registry: NodeRegistry::new(config.snap_tolerance_deg),
            graph: LaneGraph::new(),
            stats: LaneBuildStats::default(),
        }
    }

    /// Add one input lane. `index` is the lane's position in the input and
    /// names the lane when it carries no `lane_id` of its own.
    pub fn add_lane(&mut self, index: usize, lane: &LaneFeature) {
        self.stats.lanes_seen += 1;
        let base_id = lane.lane_id.clone().unwrap_or_else(|| index.to_string());

        let parts: Vec<&LineString> = match &lane.geometry {
            Some(Geometry::LineString(line)) => vec![line],
            Some(Geometry::MultiLineString(multi)) => multi.0.iter().collect(),
            Some(_) => {
                debug!("Lane {} has a non-line geometry, skipping", base_id);
                self.stats.unsupported_geometries += 1;
                return;
            }
            None => {
                self.stats.empty_geometries += 1;
                return;
            }
        };
        if parts.is_empty() {
            self.stats.empty_geometries += 1;
            return;
        }

        let multi_part = parts.len() > 1;
        for (part_idx, part) in parts.into_iter().enumerate() {
            let part_id = if multi_part {
                format!("{}.{}", base_id, part_idx)
            } else {
                base_id.clone()
            };
            self.add_part(&part_id, part);
        }
    }

    fn add_part(&mut self, part_id: &str, part: &LineString) {
        self.stats.parts_seen += 1;
        if part.0.len() < 2 {
            self.stats.empty_geometries += 1;
            return;
        }
        if part.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            debug!("Lane part {} has non-finite coordinates, skipping", part_id);
            self.stats.non_finite_geometries += 1;
            return;
        }

        if self.split_count > 1 {
            let pieces = split_equal_length(part, self.split_count);
            if pieces.len() > 1 {
                for (seg_idx, piece) in pieces.iter().enumerate() {
                    self.add_segment(format!("{}:{}", part_id, seg_idx), piece);
                }
                return;
            }
        }
        self.add_segment(part_id.to_string(), part);
    }

    fn add_segment(&mut self, lane_id: String, line: &LineString) {
        let metric = line_to_web_merc(line);
        let length_km = planar_length(&metric) / 1000.0;
        if length_km <= 0.0 {
            debug!("Lane segment {} has zero length, skipping", lane_id);
            self.stats.zero_length_parts += 1;
            return;
        }

        // at least two coordinates were checked by the caller
        let (Some(&first), Some(&last)) = (line.0.first(), line.0.last()) else {
            self.stats.empty_geometries += 1;
            return;
        };
        let source = self.registry.find_or_create_node(&mut self.graph, first);
        let target = self.registry.find_or_create_node(&mut self.graph, last);

        let edge = LaneEdge {
            source,
            target,
            length_km,
            polyline: line.clone(),
            chokepoints: self.chokepoints.tag(&metric),
            lane_id,
            synthetic: false,
        };
        match self.graph.add_edg(edge) {
            Some(_) => self.stats.edges_added += 1,
            None => self.stats.duplicate_edges += 1,
        }
    }

    pub fn finish(self) -> (LaneGraph, LaneBuildStats) {
        info!(
            "Base lane graph: {} nodes, {} edges from {} lanes ({} parts)",
            self.graph.num_nodes(),
            self.graph.num_edges(),
            self.stats.lanes_seen,
            self.stats.parts_seen
        );
        (self.graph, self.stats)
    }
}

pub fn build_lane_graph(
    lanes: &[LaneFeature],
    config: &GraphConfig,
    chokepoints: &ChokepointRegistry,
) -> (LaneGraph, LaneBuildStats) {
    let mut builder = LaneGraphBuilder::new(config, chokepoints);
    for (index, lane) in lanes.iter().enumerate() {
        builder.add_lane(index, lane);
    }
    builder.finish()
}

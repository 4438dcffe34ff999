// ===========================================================================
// Graph assembly driver
// ===========================================================================
use crate::chokepoints::ChokepointRegistry;
use crate::config::GraphConfig;
use crate::connectivity::{ConnectivitySummary, summarize};
use crate::dead_ends::{DeadEndStats, repair_dead_ends};
use crate::error::GraphBuildError;
use crate::graph::LaneGraph;
use crate::graph_formats::ExportGraph;
use crate::input::{LaneFeature, PortFeature};
use crate::lane_builder::{LaneBuildStats, build_lane_graph};
use crate::ports::{Port, PortStats, associate_ports};
use log::{info, warn};
use std::collections::BTreeMap;

/// Everything counted along the way. Skipped records and unrepaired dead
/// ends show up here instead of failing the run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub lanes: LaneBuildStats,
    pub dead_ends: DeadEndStats,
    pub ports: PortStats,
    pub connectivity: ConnectivitySummary,
    /// Node count per degree in the final graph
    pub degrees: BTreeMap<usize, usize>,
}

impl RunReport {
    pub fn log(&self) {
        let l = &self.lanes;
        info!(
            "Lanes: {} seen, {} parts, {} edges; skipped {} empty, {} unsupported, {} non-finite, {} zero-length, {} duplicate",
            l.lanes_seen,
            l.parts_seen,
            l.edges_added,
            l.empty_geometries,
            l.unsupported_geometries,
            l.non_finite_geometries,
            l.zero_length_parts,
            l.duplicate_edges
        );
        info!(
            "Dead ends: {} found, {} repaired, {} left as-is",
            self.dead_ends.dead_ends_found, self.dead_ends.repaired, self.dead_ends.unrepaired
        );
        info!(
            "Ports: {} seen, {} mapped, {} dropped",
            self.ports.ports_seen,
            self.ports.mapped,
            self.ports.dropped()
        );
        info!(
            "Final degrees: {} dead ends left, histogram {:?}",
            self.degrees.get(&1).copied().unwrap_or(0),
            self.degrees
        );
        let c = &self.connectivity;
        info!(
            "Connectivity: {} components, largest has {} nodes ({:.1}% of total), {} isolated nodes. Top sizes: {:?}",
            c.num_components,
            c.largest_component,
            c.largest_share * 100.0,
            c.isolated_nodes,
            c.top_sizes
        );
    }
}

pub struct AssembledGraph {
    pub graph: LaneGraph,
    pub ports: Vec<Port>,
    pub chokepoints: ChokepointRegistry,
    pub report: RunReport,
}

impl AssembledGraph {
    pub fn to_export(&self) -> ExportGraph {
        ExportGraph::from(self)
    }
}

/// Build the port-to-port lane graph: base graph from lanes, dead-end repair,
/// then port association.
pub fn assemble_graph(
    lanes: &[LaneFeature],
    ports: &[PortFeature],
    config: &GraphConfig,
) -> Result<AssembledGraph, GraphBuildError> {
    config.validate()?;
    if lanes.is_empty() {
        return Err(GraphBuildError::NoLaneFeatures);
    }
    if ports.is_empty() {
        return Err(GraphBuildError::NoPortFeatures);
    }

    info!("Building transport graph from {} lanes and {} ports...", lanes.len(), ports.len());
    let chokepoints = ChokepointRegistry::maritime_defaults(config.chokepoint_buffer_km);

    let (mut graph, lane_stats) = build_lane_graph(lanes, config, &chokepoints);
    if graph.is_empty() {
        return Err(GraphBuildError::EmptyGraph { lanes: lanes.len() });
    }

    let dead_end_stats = repair_dead_ends(&mut graph, config);
    let (mapped_ports, port_stats) = associate_ports(&graph, ports, config);
    if mapped_ports.is_empty() {
        warn!("No ports could be attached to the lane graph");
    }

    let report = RunReport {
        lanes: lane_stats,
        dead_ends: dead_end_stats,
        ports: port_stats,
        connectivity: summarize(&graph),
        degrees: graph.degree_histogram(),
    };
    report.log();

    Ok(AssembledGraph {
        graph,
        ports: mapped_ports,
        chokepoints,
        report,
    })
}

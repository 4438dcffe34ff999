use crate::error::GraphBuildError;
use crate::pipeline::AssembledGraph;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportNode {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportEdge {
    pub source: String,
    pub target: String,
    pub dist_km: f64,
    pub geometry: Vec<[f64; 2]>, // lon, lat
    pub chokepoints: Vec<String>,
    pub lane_id: String,
    /// Only written for edges created by dead-end repair
    #[serde(default, skip_serializing_if = "is_false")]
    pub fixed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportPort {
    pub id: String,
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub node_id: String,
    /// Kilometers
    pub dist_to_node: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportChokepoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportGraph {
    pub nodes: BTreeMap<String, ExportNode>,
    pub edges: Vec<ExportEdge>,
    pub ports: BTreeMap<String, ExportPort>,
    pub chokepoints: BTreeMap<String, ExportChokepoint>,
}

impl From<&AssembledGraph> for ExportGraph {
    fn from(assembled: &AssembledGraph) -> Self {
        let nodes = assembled
            .graph
            .nodes()
            .iter()
            .map(|n| {
                let id = n.id.to_string();
                (
                    id.clone(),
                    ExportNode {
                        id,
                        lat: n.lat,
                        lon: n.lon,
                    },
                )
            })
            .collect();

        let edges = assembled
            .graph
            .edges()
            .iter()
            .map(|e| ExportEdge {
                source: e.source.to_string(),
                target: e.target.to_string(),
                dist_km: e.length_km,
                geometry: e.polyline.coords().map(|c| [c.x, c.y]).collect(),
                chokepoints: e.chokepoints.iter().cloned().collect(),
                lane_id: e.lane_id.clone(),
                fixed: e.synthetic,
            })
            .collect();

        let ports = assembled
            .ports
            .iter()
            .map(|p| {
                (
                    p.id.clone(),
                    ExportPort {
                        id: p.id.clone(),
                        name: p.name.clone(),
                        country: p.country.clone(),
                        lat: p.lat,
                        lon: p.lon,
                        node_id: p.node_id.to_string(),
                        dist_to_node: p.dist_to_node_km,
                    },
                )
            })
            .collect();

        let chokepoints = assembled
            .chokepoints
            .chokepoints()
            .iter()
            .map(|c| {
                (
                    c.name.clone(),
                    ExportChokepoint {
                        name: c.name.clone(),
                        lat: c.lat,
                        lon: c.lon,
                    },
                )
            })
            .collect();

        Self {
            nodes,
            edges,
            ports,
            chokepoints,
        }
    }
}

/// Write the graph as JSON. The file appears at `path` only once it is
/// completely written; on failure nothing is left behind.
pub fn write_graph_json(path: &Path, graph: &ExportGraph) -> Result<(), GraphBuildError> {
    let io_err = |source| GraphBuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut writer, graph)?;
        writer.flush().map_err(io_err)?;
    }
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    info!(
        "Saved graph to {} ({} nodes, {} edges, {} ports)",
        path.display(),
        graph.nodes.len(),
        graph.edges.len(),
        graph.ports.len()
    );
    Ok(())
}

pub fn read_graph_json(path: &Path) -> Result<ExportGraph, GraphBuildError> {
    let file = std::fs::File::open(path).map_err(|source| GraphBuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

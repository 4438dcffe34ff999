use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphBuildError {
    #[error("No lane features supplied")]
    NoLaneFeatures,
    #[error("No port features supplied")]
    NoPortFeatures,
    #[error("Graph has no nodes after building from {lanes} lane features")]
    EmptyGraph { lanes: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse GeoJSON in '{path}': {source}")]
    GeoJson {
        path: PathBuf,
        #[source]
        source: geojson::Error,
    },
    #[error("Expected a FeatureCollection in '{0}'")]
    NotAFeatureCollection(PathBuf),
    #[error("Failed to parse config: {0}")]
    Config(#[from] ron::error::SpannedError),
    #[error("Failed to serialize graph: {0}")]
    Json(#[from] serde_json::Error),
}

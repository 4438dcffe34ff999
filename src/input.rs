//! Lane and port records consumed by the assembler, plus a GeoJSON adapter.

use crate::error::GraphBuildError;
use geo_types::{Geometry, LineString};
use geojson::{Feature, GeoJson};
use log::debug;
use serde_json::Value as JsonValue;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LaneFeature {
    pub lane_id: Option<String>,
    pub geometry: Option<Geometry>,
}

impl LaneFeature {
    pub fn line(lane_id: Option<&str>, coords: Vec<(f64, f64)>) -> Self {
        Self {
            lane_id: lane_id.map(str::to_string),
            geometry: Some(Geometry::LineString(LineString::from(coords))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PortFeature {
    pub port_id: Option<String>,
    pub name: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

fn read_feature_collection(path: &Path) -> Result<Vec<Feature>, GraphBuildError> {
    let text = std::fs::read_to_string(path).map_err(|source| GraphBuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: GeoJson = text.parse().map_err(|source| GraphBuildError::GeoJson {
        path: path.to_path_buf(),
        source,
    })?;
    match parsed {
        GeoJson::FeatureCollection(fc) => Ok(fc.features),
        _ => Err(GraphBuildError::NotAFeatureCollection(path.to_path_buf())),
    }
}

/// Convert through the `geo-types` support in `geojson`. Any geometry kind is
/// kept so the graph builder can tell unsupported kinds from missing ones.
fn to_geometry(geometry: &geojson::Geometry) -> Option<Geometry> {
    match Geometry::try_from(geometry.clone()) {
        Ok(converted) => Some(converted),
        Err(e) => {
            debug!("Ignoring geometry that could not be converted: {}", e);
            None
        }
    }
}

/// Property as a string. Numbers are rendered without a trailing `.0`.
fn string_property(feature: &Feature, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match feature.property(k)? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.to_string(),
        }),
        _ => None,
    })
}

fn float_property(feature: &Feature, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match feature.property(k)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn lane_from_feature(feature: &Feature) -> LaneFeature {
    LaneFeature {
        lane_id: string_property(feature, &["lane_id"]),
        geometry: feature.geometry.as_ref().and_then(to_geometry),
    }
}

pub fn port_from_feature(feature: &Feature) -> PortFeature {
    let point = match feature.geometry.as_ref().and_then(to_geometry) {
        Some(Geometry::Point(p)) => Some(p.0),
        _ => None,
    };
    PortFeature {
        port_id: string_property(feature, &["port_id"]),
        name: string_property(feature, &["name", "CITY"]),
        country: string_property(feature, &["country", "COUNTRY"]),
        lat: point
            .map(|c| c.y)
            .or_else(|| float_property(feature, &["lat", "LATITUDE"])),
        lon: point
            .map(|c| c.x)
            .or_else(|| float_property(feature, &["lon", "LONGITUDE"])),
    }
}

pub fn load_lanes(path: &Path) -> Result<Vec<LaneFeature>, GraphBuildError> {
    Ok(read_feature_collection(path)?
        .iter()
        .map(lane_from_feature)
        .collect())
}

pub fn load_ports(path: &Path) -> Result<Vec<PortFeature>, GraphBuildError> {
    Ok(read_feature_collection(path)?
        .iter()
        .map(port_from_feature)
        .collect())
}

use crate::error::GraphBuildError;
use serde::Deserialize;
use std::path::Path;

/// Which nodes a dead end is allowed to be stitched to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeadEndCandidates {
    /// Only nodes in another connected component. Natural ends of an
    /// already connected path are left alone.
    #[default]
    OtherComponent,
    /// Any node that is not already adjacent to the dead end.
    NonAdjacent,
}

/// How the length of a synthetic repair edge is computed.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticLength {
    /// Degree distance times `degrees_to_km`.
    #[default]
    DegreeApprox,
    /// Web Mercator length, same as lane edges.
    Projected,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GraphConfig {
    /// Endpoints closer than this (degrees) collapse into one node.
    pub snap_tolerance_deg: f64,
    /// Dead ends only look this far (degrees) for a partner.
    pub dead_end_search_radius_deg: f64,
    pub degrees_to_km: f64,
    pub chokepoint_buffer_km: f64,
    pub dead_end_candidates: DeadEndCandidates,
    pub synthetic_length: SyntheticLength,
    /// Number of equal-length pieces every lane part is cut into. 1 = no split.
    pub lane_split_count: usize,
    /// Ports further than this from their node are dropped.
    pub max_port_offset_km: Option<f64>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            snap_tolerance_deg: 0.2,
            dead_end_search_radius_deg: 10.0,
            degrees_to_km: 111.0,
            chokepoint_buffer_km: 50.0,
            dead_end_candidates: DeadEndCandidates::default(),
            synthetic_length: SyntheticLength::default(),
            lane_split_count: 1,
            max_port_offset_km: None,
        }
    }
}

impl GraphConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, GraphBuildError> {
        let config: GraphConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron_file(path: &Path) -> Result<Self, GraphBuildError> {
        let text = std::fs::read_to_string(path).map_err(|source| GraphBuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn validate(&self) -> Result<(), GraphBuildError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(GraphBuildError::InvalidConfig(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )))
            }
        };

        positive("snap_tolerance_deg", self.snap_tolerance_deg)?;
        positive("dead_end_search_radius_deg", self.dead_end_search_radius_deg)?;
        positive("degrees_to_km", self.degrees_to_km)?;
        positive("chokepoint_buffer_km", self.chokepoint_buffer_km)?;
        if let Some(limit) = self.max_port_offset_km {
            positive("max_port_offset_km", limit)?;
        }
        if self.lane_split_count == 0 {
            return Err(GraphBuildError::InvalidConfig(
                "lane_split_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Longest synthetic edge the degree approximation can produce.
    pub fn max_synthetic_length_km(&self) -> f64 {
        self.dead_end_search_radius_deg * self.degrees_to_km
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GraphConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dead_end_candidates, DeadEndCandidates::OtherComponent);
        assert_eq!(config.max_synthetic_length_km(), 1110.0);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = GraphConfig::from_ron_str(
            "(snap_tolerance_deg: 0.05, dead_end_candidates: non_adjacent, max_port_offset_km: Some(50.0))",
        )
        .unwrap();
        assert_eq!(config.snap_tolerance_deg, 0.05);
        assert_eq!(config.dead_end_candidates, DeadEndCandidates::NonAdjacent);
        assert_eq!(config.max_port_offset_km, Some(50.0));
        assert_eq!(config.chokepoint_buffer_km, 50.0, "unset fields fall back to defaults");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(GraphConfig::from_ron_str("(snap_tolerance_deg: 0.0)").is_err());
        assert!(GraphConfig::from_ron_str("(lane_split_count: 0)").is_err());
        assert!(GraphConfig::from_ron_str("(not valid ron").is_err());
    }
}

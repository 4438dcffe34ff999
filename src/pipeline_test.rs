#[cfg(test)]
mod tests {
    use crate::config::{DeadEndCandidates, GraphConfig};
    use crate::error::GraphBuildError;
    use crate::graph::EdgeKey;
    use crate::input::{LaneFeature, PortFeature};
    use crate::pipeline::assemble_graph;
    use ahash::AHashSet;

    fn port(id: &str, lon: f64, lat: f64) -> PortFeature {
        PortFeature {
            port_id: Some(id.to_string()),
            name: Some(id.to_uppercase()),
            country: Some("XX".to_string()),
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// A few lanes from Gibraltar to Bab el-Mandeb with a junction near Malta,
    /// a gap north of the Red Sea and a detached stub.
    fn sample_lanes() -> Vec<LaneFeature> {
        vec![
            LaneFeature::line(Some("gib_med"), vec![(-8.0, 36.0), (-5.6, 35.95), (3.0, 37.5)]),
            LaneFeature::line(Some("med_central"), vec![(3.05, 37.5), (15.0, 35.0)]),
            LaneFeature::line(Some("med_east"), vec![(15.0, 35.0), (31.0, 32.0)]),
            LaneFeature::line(Some("suez"), vec![(31.0, 32.0), (32.3, 30.6), (32.6, 29.8)]),
            LaneFeature::line(Some("red_sea"), vec![(33.5, 28.5), (38.0, 21.0), (43.3, 12.6)]),
            LaneFeature::line(Some("aegean"), vec![(15.1, 35.05), (26.0, 39.5)]),
            LaneFeature::line(Some("stub"), vec![(28.0, 24.0), (29.0, 24.0)]),
        ]
    }

    #[test]
    fn test_two_segment_path_scenario() {
        let lanes = vec![
            LaneFeature::line(None, vec![(0.0, 0.0), (1.0, 0.0)]),
            LaneFeature::line(None, vec![(1.0001, 0.0), (2.0, 0.0)]),
        ];
        let result = assemble_graph(&lanes, &[port("p", 0.0, 0.1)], &GraphConfig::default()).unwrap();

        assert_eq!(result.graph.num_nodes(), 3);
        assert_eq!(result.graph.num_edges(), 2);
        assert!(result.graph.edges().iter().all(|e| !e.synthetic));
        assert_eq!(result.report.connectivity.num_components, 1);
        assert_eq!(result.report.dead_ends.dead_ends_found, 2);
        assert_eq!(result.report.dead_ends.repaired, 0);
        let degrees: Vec<_> = result.report.degrees.iter().map(|(d, n)| (*d, *n)).collect();
        assert_eq!(degrees, vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn test_graph_invariants_hold_on_sample_network() {
        let ports = vec![
            port("algeciras", -5.45, 36.13),
            port("piraeus", 23.6, 37.9),
            port("jeddah", 39.1, 21.5),
            port("broken", f64::NAN, 0.0),
        ];
        let config = GraphConfig::default();
        let result = assemble_graph(&sample_lanes(), &ports, &config).unwrap();
        let graph = &result.graph;

        let mut keys = AHashSet::new();
        for edge in graph.edges() {
            assert!(edge.source.0 < graph.num_nodes() && edge.target.0 < graph.num_nodes());
            assert!(edge.length_km >= 0.0);
            assert!(keys.insert(EdgeKey::new(edge.source, edge.target, &edge.lane_id)), "duplicate key");
        }

        for fix in graph.edges().iter().filter(|e| e.synthetic) {
            assert!(fix.length_km <= config.max_synthetic_length_km());
            let parallel_lane_edges = graph
                .edges()
                .iter()
                .filter(|e| !e.synthetic && e.key().low == fix.key().low && e.key().high == fix.key().high)
                .count();
            assert_eq!(parallel_lane_edges, 0, "repair must not duplicate an existing adjacency");
        }

        let export = result.to_export();
        assert_eq!(export.ports.len(), 3);
        assert_eq!(result.report.ports.invalid_coords, 1);
        for p in export.ports.values() {
            assert!(export.nodes.contains_key(&p.node_id), "port {} points at a missing node", p.id);
        }
        assert_eq!(export.chokepoints.len(), 12);
    }

    #[test]
    fn test_sample_network_tags_and_repairs() {
        let result = assemble_graph(&sample_lanes(), &[port("x", 0.0, 0.0)], &GraphConfig::default()).unwrap();
        let graph = &result.graph;

        let by_lane = |id: &str| graph.edges().iter().find(|e| e.lane_id == id).unwrap();
        assert!(by_lane("gib_med").chokepoints.contains("Strait of Gibraltar"));
        assert!(by_lane("suez").chokepoints.contains("Suez Canal"));
        assert!(by_lane("red_sea").chokepoints.contains("Bab el-Mandeb"));
        assert!(by_lane("med_east").chokepoints.is_empty());

        // the aegean lane snaps onto the junction the two med lanes share
        assert_eq!(graph.num_nodes(), 10);
        // suez end -> red sea start, then red sea start -> stub
        assert_eq!(result.report.dead_ends.repaired, 2);
        assert_eq!(
            result.report.connectivity.num_components, 1,
            "repairs should pull every lane into one network"
        );
    }

    #[test]
    fn test_chokepoint_tags_are_stable_across_runs() {
        let config = GraphConfig::default();
        let ports = [port("x", 0.0, 0.0)];
        let first = assemble_graph(&sample_lanes(), &ports, &config).unwrap().to_export();
        for _ in 0..3 {
            let again = assemble_graph(&sample_lanes(), &ports, &config).unwrap().to_export();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_non_adjacent_policy_still_respects_invariants() {
        let config = GraphConfig {
            dead_end_candidates: DeadEndCandidates::NonAdjacent,
            ..GraphConfig::default()
        };
        let result = assemble_graph(&sample_lanes(), &[port("x", 0.0, 0.0)], &config).unwrap();
        for fix in result.graph.edges().iter().filter(|e| e.synthetic) {
            assert!(fix.length_km <= config.max_synthetic_length_km());
            assert_ne!(fix.source, fix.target);
        }
    }

    #[test]
    fn test_structural_failures_abort() {
        let lanes = vec![LaneFeature::line(None, vec![(0.0, 0.0), (1.0, 0.0)])];
        let ports = vec![port("p", 0.0, 0.0)];
        let config = GraphConfig::default();

        assert!(matches!(assemble_graph(&[], &ports, &config), Err(GraphBuildError::NoLaneFeatures)));
        assert!(matches!(assemble_graph(&lanes, &[], &config), Err(GraphBuildError::NoPortFeatures)));

        let only_garbage = vec![LaneFeature::default(), LaneFeature::line(None, vec![(1.0, 1.0)])];
        assert!(matches!(
            assemble_graph(&only_garbage, &ports, &config),
            Err(GraphBuildError::EmptyGraph { lanes: 2 })
        ));

        let bad_config = GraphConfig {
            snap_tolerance_deg: -1.0,
            ..GraphConfig::default()
        };
        assert!(matches!(
            assemble_graph(&lanes, &ports, &bad_config),
            Err(GraphBuildError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_port_scenario_five_vs_fifty_km() {
        // nodes at 5 km east and 50 km west of the port, on the equator
        let deg_per_km = 1.0 / 111.319_490_793;
        let lanes = vec![
            LaneFeature::line(Some("east"), vec![(5.0 * deg_per_km, 0.0), (5.0 * deg_per_km, 3.0)]),
            LaneFeature::line(Some("west"), vec![(-50.0 * deg_per_km, 0.0), (-50.0 * deg_per_km, -3.0)]),
        ];
        let result = assemble_graph(&lanes, &[port("harbor", 0.0, 0.0)], &GraphConfig::default()).unwrap();

        let harbor = &result.ports[0];
        let node = result.graph.node(harbor.node_id);
        assert!((node.lon - 5.0 * deg_per_km).abs() < 1e-12 && node.lat == 0.0);
        assert!((harbor.dist_to_node_km - 5.0).abs() < 1e-6);
    }
}

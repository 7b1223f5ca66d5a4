//! Unit tests for sr-network.
//!
//! All tests use hand-crafted networks and snapshots.

#[cfg(test)]
mod helpers {
    use sr_core::{EdgeId, IdwConfig, NodeId, Position};
    use sr_risk::{RiskField, RiskSnapshot};

    use crate::{Node, WeightedRoadNetwork};

    pub const A: NodeId = NodeId(1);
    pub const B: NodeId = NodeId(2);
    pub const C: NodeId = NodeId(3);
    pub const AB: EdgeId = EdgeId(10);
    pub const AC: EdgeId = EdgeId(11);

    /// A at the origin, B and C five metres away; undirected A–B and A–C.
    pub fn triangle() -> WeightedRoadNetwork {
        let mut net = WeightedRoadNetwork::new(50.0).unwrap();
        net.add_node(Node::new(A, Position::new(0.0, 0.0)).named("A")).unwrap();
        net.add_node(Node::new(B, Position::new(5.0, 0.0)).named("B")).unwrap();
        net.add_node(Node::new(C, Position::new(0.0, 5.0)).named("C")).unwrap();
        net.add_road(AB, A, B, 5.0).unwrap();
        net.add_road(AC, A, C, 5.0).unwrap();
        net
    }

    /// Edge samples A–B 0.1 and A–C 0.5, plus node samples for IDW.
    pub fn triangle_field(ab: f64, ac: f64) -> RiskField {
        let mut s = RiskSnapshot::new(1_000);
        s.insert_node(A, Position::new(0.0, 0.0), 0.2)
            .insert_node(B, Position::new(5.0, 0.0), 0.2)
            .insert_node(C, Position::new(0.0, 5.0), 0.6)
            .insert_edge(AB, A, B, ab)
            .insert_edge(AC, A, C, ac);
        RiskField::from_snapshot(&s, IdwConfig::default()).unwrap()
    }
}

// ── Topology construction ─────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use sr_core::{EdgeId, NodeId, Position};

    use super::helpers::{triangle, A, AB, AC, B, C};
    use crate::{Edge, NetworkError, Node, WeightedRoadNetwork};

    #[test]
    fn empty_network() {
        let net = WeightedRoadNetwork::default();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
        assert_eq!(net.penalty_factor(), 50.0);
    }

    #[test]
    fn negative_penalty_rejected_at_construction() {
        assert!(matches!(WeightedRoadNetwork::new(-1.0), Err(NetworkError::InvalidPenalty(_))));
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut net = triangle();
        let err = net.add_node(Node::new(A, Position::new(9.0, 9.0))).unwrap_err();
        assert!(matches!(err, NetworkError::DuplicateNode(id) if id == A));
        assert_eq!(net.node(A).unwrap().position, Position::new(0.0, 0.0));
    }

    #[test]
    fn duplicate_edge_rejected() {
        let mut net = triangle();
        let err = net.add_road(AB, B, C, 3.0).unwrap_err();
        assert!(matches!(err, NetworkError::DuplicateEdge(id) if id == AB));
        assert_eq!(net.edge(AB).unwrap().to, B);
    }

    #[test]
    fn unknown_endpoint_leaves_network_unchanged() {
        let mut net = triangle();
        let before = net.export_snapshot();
        let err = net.add_road(EdgeId(99), A, NodeId(404), 1.0).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::UnknownEndpoint { edge: EdgeId(99), node: NodeId(404) }
        ));
        assert_eq!(net.export_snapshot(), before);
        assert_eq!(net.neighbors(A).unwrap().len(), 2);
    }

    #[test]
    fn non_positive_distance_rejected() {
        let mut net = triangle();
        for d in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let r = net.add_road(EdgeId(50), B, C, d);
            assert!(matches!(r, Err(NetworkError::InvalidDistance { .. })), "distance {d}");
        }
        assert_eq!(net.edge_count(), 2);
    }

    #[test]
    fn invalid_speed_rejected() {
        let mut net = triangle();
        let r = net.add_edge(Edge::new(EdgeId(50), B, C, 3.0).with_speed_kmh(0.0));
        assert!(matches!(r, Err(NetworkError::InvalidSpeed { .. })));
    }

    #[test]
    fn non_finite_node_position_rejected() {
        let mut net = WeightedRoadNetwork::default();
        let r = net.add_node(Node::new(NodeId(1), Position::new(f64::NAN, 0.0)));
        assert!(matches!(r, Err(NetworkError::InvalidPosition(_))));
        assert!(net.is_empty());
    }

    #[test]
    fn undirected_edge_indexed_both_ways() {
        let net = triangle();
        assert_eq!(net.neighbors(A).unwrap(), &[(B, AB), (C, AC)]);
        assert_eq!(net.neighbors(B).unwrap(), &[(A, AB)]);
        assert_eq!(net.out_degree(C).unwrap(), 1);
    }

    #[test]
    fn directed_edge_indexed_one_way() {
        let mut net = triangle();
        net.add_one_way(EdgeId(20), B, C, 7.0).unwrap();
        assert!(net.neighbors(B).unwrap().contains(&(C, EdgeId(20))));
        assert!(!net.neighbors(C).unwrap().iter().any(|&(n, _)| n == B));
        assert!(net.edge(EdgeId(20)).unwrap().directed);
    }

    #[test]
    fn unknown_lookups_error() {
        let net = triangle();
        assert!(matches!(net.neighbors(NodeId(77)), Err(NetworkError::UnknownNode(_))));
        assert!(matches!(net.edge_cost(EdgeId(77)), Err(NetworkError::UnknownEdge(_))));
        assert!(matches!(net.edge_distance(EdgeId(77)), Err(NetworkError::UnknownEdge(_))));
        assert!(matches!(net.edge_risk(EdgeId(77)), Err(NetworkError::UnknownEdge(_))));
    }

    #[test]
    fn fresh_edges_cost_their_distance() {
        let net = triangle();
        assert_eq!(net.edge_risk(AB).unwrap(), 0.0);
        assert_eq!(net.edge_cost(AB).unwrap(), 5.0);
    }

    #[test]
    fn edge_helpers() {
        let e = Edge::new(EdgeId(1), A, B, 1.0);
        assert_eq!(e.other_end(A), Some(B));
        assert_eq!(e.other_end(C), None);
        assert!(e.connects(B, A));
        assert!(!e.clone().one_way().connects(B, A));
    }
}

// ── Cost refresh ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod refresh {
    use sr_core::{EdgeId, IdwConfig, Position};
    use sr_risk::{RiskField, RiskSnapshot};

    use super::helpers::{triangle, triangle_field, A, AB, AC, B, C};
    use crate::{risk_cost, NetworkError};

    #[test]
    fn penalty_costs_match_formula() {
        let mut net = triangle();
        let updated = net.refresh_risk_costs(&triangle_field(0.1, 0.5)).unwrap();
        assert_eq!(updated, 2);
        assert!((net.edge_cost(AB).unwrap() - 30.0).abs() < 1e-9);
        assert!((net.edge_cost(AC).unwrap() - 130.0).abs() < 1e-9);
        for e in net.edges() {
            assert_eq!(e.cost(), risk_cost(e.distance, e.risk(), 50.0));
        }
    }

    #[test]
    fn risk_escalation_raises_cost() {
        let mut net = triangle();
        net.refresh_risk_costs(&triangle_field(0.1, 0.5)).unwrap();
        assert!((net.edge_cost(AB).unwrap() / 5.0 - 6.0).abs() < 1e-9);

        net.refresh_risk_costs(&triangle_field(0.95, 0.5)).unwrap();
        assert!((net.edge_cost(AB).unwrap() / 5.0 - 48.5).abs() < 1e-9);
    }

    #[test]
    fn cost_is_monotonic_in_risk() {
        let mut previous = 0.0;
        for step in 0..=20 {
            let risk = step as f64 / 20.0;
            let mut net = triangle();
            net.refresh_risk_costs(&triangle_field(risk, 0.0)).unwrap();
            let cost = net.edge_cost(AB).unwrap();
            assert!(cost >= previous, "risk {risk}: {cost} < {previous}");
            assert!(cost >= net.edge_distance(AB).unwrap());
            previous = cost;
        }
    }

    #[test]
    fn missing_edge_sample_falls_back_to_midpoint_idw() {
        let mut net = triangle();
        let mut s = RiskSnapshot::new(0);
        s.insert_node(A, Position::new(0.0, 0.0), 0.2)
            .insert_node(B, Position::new(5.0, 0.0), 0.8)
            .insert_node(C, Position::new(0.0, 5.0), 0.2);
        let field = RiskField::from_snapshot(&s, IdwConfig { k: 2, power: 2.0 }).unwrap();
        net.refresh_risk_costs(&field).unwrap();
        // Midpoint of A–B is equidistant from A and B.
        assert!((net.edge_risk(AB).unwrap() - 0.5).abs() < 1e-12);
        assert!((net.edge_risk(AC).unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn reload_leaves_no_stale_costs() {
        let mut net = triangle();
        net.refresh_risk_costs(&triangle_field(0.9, 0.9)).unwrap();
        net.refresh_risk_costs(&triangle_field(0.0, 0.3)).unwrap();
        assert_eq!(net.edge_cost(AB).unwrap(), 5.0);
        assert!((net.edge_cost(AC).unwrap() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn failed_refresh_keeps_previous_costs() {
        let mut net = triangle();
        net.refresh_risk_costs(&triangle_field(0.1, 0.5)).unwrap();
        let before = net.export_snapshot();

        // Only A–B has a sample; A–C needs IDW but there are no node samples.
        let mut s = RiskSnapshot::new(0);
        s.insert_edge(AB, A, B, 0.9);
        let field = RiskField::from_snapshot(&s, IdwConfig::default()).unwrap();
        let err = net.refresh_risk_costs(&field).unwrap_err();
        assert!(matches!(err, NetworkError::Risk(sr_risk::RiskError::EmptyField)));
        assert_eq!(net.export_snapshot(), before);
    }

    #[test]
    fn penalty_update_recomputes_all_costs() {
        let mut net = triangle();
        net.refresh_risk_costs(&triangle_field(0.1, 0.5)).unwrap();
        net.update_risk_penalty_factor(10.0).unwrap();
        assert!((net.edge_cost(AB).unwrap() - 10.0).abs() < 1e-9);
        assert!((net.edge_cost(AC).unwrap() - 30.0).abs() < 1e-9);

        net.update_risk_penalty_factor(0.0).unwrap();
        assert_eq!(net.edge_cost(AC).unwrap(), 5.0);
    }

    #[test]
    fn invalid_penalty_update_rejected() {
        let mut net = triangle();
        assert!(net.update_risk_penalty_factor(f64::NAN).is_err());
        assert!(net.update_risk_penalty_factor(-0.5).is_err());
        assert_eq!(net.penalty_factor(), 50.0);
    }

    #[test]
    fn risk_filters_partition_edges() {
        let mut net = triangle();
        net.refresh_risk_costs(&triangle_field(0.1, 0.5)).unwrap();
        let high: Vec<EdgeId> = net.high_risk_edges(0.5).iter().map(|e| e.id).collect();
        let low: Vec<EdgeId> = net.low_risk_edges(0.5).iter().map(|e| e.id).collect();
        assert_eq!(high, vec![AC]);
        assert_eq!(low, vec![AB]);
        assert_eq!(net.high_risk_edges(0.0).len(), 2);
    }
}

// ── Validation & stats ────────────────────────────────────────────────────────

#[cfg(test)]
mod stats {
    use sr_core::{NodeId, Position};

    use super::helpers::{triangle, triangle_field};
    use crate::{NetworkError, Node, Violation, WeightedRoadNetwork};

    #[test]
    fn clean_network_has_no_violations() {
        assert!(triangle().validate().is_empty());
    }

    #[test]
    fn orphan_node_reported() {
        let mut net = triangle();
        net.add_node(Node::new(NodeId(9), Position::new(50.0, 50.0))).unwrap();
        assert_eq!(net.validate(), vec![Violation::OrphanNode(NodeId(9))]);
    }

    #[test]
    fn stats_averages() {
        let mut net = triangle();
        net.refresh_risk_costs(&triangle_field(0.1, 0.5)).unwrap();
        let s = net.graph_stats().unwrap();
        assert_eq!(s.node_count, 3);
        assert_eq!(s.edge_count, 2);
        assert_eq!(s.directed_edge_count, 0);
        assert_eq!(s.avg_distance, 5.0);
        assert!((s.avg_risk - 0.3).abs() < 1e-12);
        assert!((s.avg_cost - 80.0).abs() < 1e-9);
        assert!(s.is_connected);
    }

    #[test]
    fn disconnected_network_detected() {
        let mut net = triangle();
        net.add_node(Node::new(NodeId(9), Position::new(50.0, 50.0))).unwrap();
        assert!(!net.graph_stats().unwrap().is_connected);
    }

    #[test]
    fn one_way_edges_count_for_weak_connectivity() {
        let mut net = WeightedRoadNetwork::default();
        net.add_node(Node::new(NodeId(1), Position::new(0.0, 0.0))).unwrap();
        net.add_node(Node::new(NodeId(2), Position::new(1.0, 0.0))).unwrap();
        net.add_one_way(sr_core::EdgeId(1), NodeId(2), NodeId(1), 1.0).unwrap();
        let s = net.graph_stats().unwrap();
        assert!(s.is_connected);
        assert_eq!(s.directed_edge_count, 1);
    }

    #[test]
    fn stats_on_empty_network() {
        assert!(matches!(
            WeightedRoadNetwork::default().graph_stats(),
            Err(NetworkError::EmptyNetwork)
        ));
    }

    #[test]
    fn single_node_network_has_zero_averages() {
        let mut net = WeightedRoadNetwork::default();
        net.add_node(Node::new(NodeId(1), Position::new(0.0, 0.0))).unwrap();
        let s = net.graph_stats().unwrap();
        assert_eq!(s.avg_cost, 0.0);
        assert!(s.is_connected);
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use sr_core::Position;

    use super::helpers::{triangle, A, B, C};
    use crate::WeightedRoadNetwork;

    #[test]
    fn snap_exact_and_nearest() {
        let net = triangle();
        assert_eq!(net.snap_to_node(Position::new(0.0, 0.0)), Some(A));
        assert_eq!(net.snap_to_node(Position::new(4.0, 0.5)), Some(B));
        assert_eq!(net.snap_to_node(Position::new(0.2, 3.9)), Some(C));
    }

    #[test]
    fn empty_network_returns_none() {
        assert!(WeightedRoadNetwork::default().snap_to_node(Position::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn k_nearest_order() {
        let net = triangle();
        let nearest = net.k_nearest_nodes(Position::new(4.0, 0.0), 2);
        assert_eq!(nearest, vec![B, A]);
    }
}

// ── Snapshot round trip ───────────────────────────────────────────────────────

#[cfg(test)]
mod persistence {
    use sr_core::{EdgeId, NodeId, Position};

    use super::helpers::{triangle, triangle_field, AB, AC, B, C};
    use crate::{Edge, NetworkError, NetworkSnapshot, Node, WeightedRoadNetwork};

    fn rich_network() -> WeightedRoadNetwork {
        let mut net = triangle();
        net.add_node(
            Node::new(NodeId(4), Position::new(0.1 + 0.2, 1.0 / 3.0))
                .named("Shelter")
                .with_kind("shelter")
                .with_meta("open", "24h"),
        )
        .unwrap();
        net.add_edge(
            Edge::new(EdgeId(12), C, NodeId(4), 7.123456789)
                .one_way()
                .with_road_type("footway")
                .with_speed_kmh(4.5),
        )
        .unwrap();
        net.refresh_risk_costs(&triangle_field(0.1, 0.5)).unwrap();
        net.update_risk_penalty_factor(37.25).unwrap();
        net
    }

    #[test]
    fn json_round_trip_is_exact() {
        let net = rich_network();
        let json = net.export_snapshot().to_json().unwrap();
        let restored = WeightedRoadNetwork::from_snapshot(&NetworkSnapshot::from_json(&json).unwrap())
            .unwrap();

        assert_eq!(restored.export_snapshot(), net.export_snapshot());
        for e in net.edges() {
            let r = restored.edge(e.id).unwrap();
            assert_eq!(r.cost().to_bits(), e.cost().to_bits());
            assert_eq!(r.risk().to_bits(), e.risk().to_bits());
        }
        assert_eq!(restored.neighbors(C).unwrap(), net.neighbors(C).unwrap());
        assert_eq!(restored.penalty_factor(), 37.25);
    }

    #[test]
    fn file_round_trip() {
        let net = rich_network();
        let file = tempfile::NamedTempFile::new().unwrap();
        net.export_snapshot().save_json(file.path()).unwrap();
        let loaded = NetworkSnapshot::load_json(file.path()).unwrap();
        let mut fresh = WeightedRoadNetwork::default();
        fresh.import_snapshot(&loaded).unwrap();
        assert_eq!(fresh.export_snapshot(), net.export_snapshot());
        assert_eq!(fresh.edge_cost(AB).unwrap(), net.edge_cost(AB).unwrap());
        assert_eq!(fresh.edge_cost(AC).unwrap(), net.edge_cost(AC).unwrap());
    }

    #[test]
    fn rejected_import_keeps_existing_network() {
        let mut net = triangle();
        let mut bad = net.export_snapshot();
        bad.edges.push(Edge::new(EdgeId(30), B, NodeId(404), 1.0));
        let err = net.import_snapshot(&bad).unwrap_err();
        assert!(matches!(err, NetworkError::UnknownEndpoint { .. }));
        assert_eq!(net.edge_count(), 2);
    }

    #[test]
    fn out_of_range_risk_in_snapshot_rejected() {
        let json = r#"{
            "nodes": [
                { "id": 1, "position": { "x": 0.0, "y": 0.0 } },
                { "id": 2, "position": { "x": 1.0, "y": 0.0 } }
            ],
            "edges": [ { "id": 5, "from": 1, "to": 2, "distance": 1.0, "risk": 1.7 } ],
            "penalty_factor": 50.0
        }"#;
        let snap = NetworkSnapshot::from_json(json).unwrap();
        assert!(matches!(
            WeightedRoadNetwork::from_snapshot(&snap),
            Err(NetworkError::InvalidRisk { .. })
        ));
    }

    #[test]
    fn malformed_json_errors() {
        assert!(matches!(NetworkSnapshot::from_json("{ nope"), Err(NetworkError::Json(_))));
    }
}

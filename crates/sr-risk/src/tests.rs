//! Unit tests for sr-risk.
//!
//! All tests use hand-written snapshots; no backend is involved.

#[cfg(test)]
mod helpers {
    use sr_core::{EdgeId, NodeId, Position};

    use crate::RiskSnapshot;

    /// Two node samples on the x axis: (0,0) risk 0.2 and (10,0) risk 0.8.
    pub fn pair_snapshot() -> RiskSnapshot {
        let mut s = RiskSnapshot::new(1_700_000_000);
        s.insert_node(NodeId(1), Position::new(0.0, 0.0), 0.2)
            .insert_node(NodeId(2), Position::new(10.0, 0.0), 0.8);
        s
    }

    /// Four nodes on a unit square plus one edge sample.
    ///
    ///   3:(0,10) r=0.9   4:(10,10) r=0.4
    ///   1:(0,0)  r=0.1   2:(10,0)  r=0.3
    pub fn square_snapshot() -> RiskSnapshot {
        let mut s = RiskSnapshot::new(1_700_000_100);
        s.insert_node(NodeId(1), Position::new(0.0, 0.0), 0.1)
            .insert_node(NodeId(2), Position::new(10.0, 0.0), 0.3)
            .insert_node(NodeId(3), Position::new(0.0, 10.0), 0.9)
            .insert_node(NodeId(4), Position::new(10.0, 10.0), 0.4)
            .insert_edge(EdgeId(12), NodeId(1), NodeId(2), 0.05);
        s
    }
}

// ── Snapshot load ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod load {
    use sr_core::{EdgeId, IdwConfig, NodeId, Position};

    use crate::{RiskError, RiskField, RiskSnapshot};

    #[test]
    fn load_replaces_all_samples() {
        let mut field = RiskField::default();
        field.load(&super::helpers::square_snapshot()).unwrap();
        assert_eq!(field.node_sample_count(), 4);
        assert_eq!(field.edge_sample_count(), 1);

        field.load(&super::helpers::pair_snapshot()).unwrap();
        assert_eq!(field.node_sample_count(), 2);
        assert_eq!(field.edge_sample_count(), 0);
        assert!(field.node_risk(NodeId(3)).is_err(), "stale sample survived reload");
        assert_eq!(field.timestamp_unix_secs(), 1_700_000_000);
    }

    #[test]
    fn invalid_risk_leaves_previous_snapshot() {
        let mut field = RiskField::default();
        field.load(&super::helpers::pair_snapshot()).unwrap();

        let mut bad = super::helpers::square_snapshot();
        bad.insert_node(NodeId(9), Position::new(5.0, 5.0), 1.5);
        let err = field.load(&bad).unwrap_err();
        assert!(matches!(err, RiskError::InvalidRisk { value, .. } if value == 1.5));

        assert_eq!(field.node_sample_count(), 2);
        assert_eq!(field.node_risk(NodeId(2)).unwrap(), 0.8);
        assert_eq!(field.timestamp_unix_secs(), 1_700_000_000);
    }

    #[test]
    fn invalid_edge_risk_rejected() {
        let mut s = RiskSnapshot::new(0);
        s.insert_edge(EdgeId(1), NodeId(1), NodeId(2), -0.1);
        assert!(matches!(
            RiskField::from_snapshot(&s, IdwConfig::default()),
            Err(RiskError::InvalidRisk { .. })
        ));
    }

    #[test]
    fn nan_risk_rejected() {
        let mut s = RiskSnapshot::new(0);
        s.insert_node(NodeId(1), Position::new(0.0, 0.0), f64::NAN);
        assert!(RiskField::from_snapshot(&s, IdwConfig::default()).is_err());
    }

    #[test]
    fn non_finite_position_rejected() {
        let mut s = RiskSnapshot::new(0);
        s.insert_point(Position::new(f64::INFINITY, 0.0), 0.3);
        assert!(matches!(
            RiskField::from_snapshot(&s, IdwConfig::default()),
            Err(RiskError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn exact_lookups() {
        let field = RiskField::from_snapshot(&super::helpers::square_snapshot(), IdwConfig::default())
            .unwrap();
        assert_eq!(field.node_risk(NodeId(3)).unwrap(), 0.9);
        assert!(matches!(field.node_risk(NodeId(42)), Err(RiskError::UnknownNode(NodeId(42)))));
        assert_eq!(field.edge_risk(EdgeId(12)), Some(0.05));
        assert_eq!(field.edge_risk(EdgeId(13)), None);
    }
}

// ── IDW interpolation ─────────────────────────────────────────────────────────

#[cfg(test)]
mod idw {
    use sr_core::{IdwConfig, Position};

    use crate::{RiskError, RiskField, RiskSnapshot};

    #[test]
    fn midpoint_of_two_samples_is_their_average() {
        let field = RiskField::from_snapshot(&super::helpers::pair_snapshot(), IdwConfig::default())
            .unwrap();
        let r = field.interpolated_risk(Position::new(5.0, 0.0)).unwrap();
        assert!((r - 0.5).abs() < 1e-12, "got {r}");
    }

    #[test]
    fn exact_sample_position_returns_sample() {
        let field = RiskField::from_snapshot(&super::helpers::pair_snapshot(), IdwConfig::default())
            .unwrap();
        assert_eq!(field.interpolated_risk(Position::new(0.0, 0.0)).unwrap(), 0.2);
        assert_eq!(field.interpolated_risk(Position::new(10.0, 0.0)).unwrap(), 0.8);
    }

    #[test]
    fn subnormal_distance_counts_as_exact_hit() {
        let mut s = RiskSnapshot::new(0);
        s.insert_point(Position::new(0.0, 0.0), 0.0)
            .insert_point(Position::new(10.0, 0.0), 1.0);
        let field = RiskField::from_snapshot(&s, IdwConfig::default()).unwrap();
        // d² underflows to a subnormal, so 1/d² overflows to infinity.
        let r = field.interpolated_risk(Position::new(1e-160, 0.0)).unwrap();
        assert_eq!(r, 0.0);
    }

    #[test]
    fn closer_sample_dominates() {
        let field = RiskField::from_snapshot(&super::helpers::pair_snapshot(), IdwConfig::default())
            .unwrap();
        // d = 2 and 8 → w = 1/4 and 1/64 → (0.05 + 0.0125) / (0.265625) ≈ 0.2353
        let r = field.interpolated_risk(Position::new(2.0, 0.0)).unwrap();
        assert!((r - 0.0625 / 0.265625).abs() < 1e-12, "got {r}");
    }

    #[test]
    fn k_limits_contributing_samples() {
        let cfg = IdwConfig { k: 1, power: 2.0 };
        let field = RiskField::from_snapshot(&super::helpers::square_snapshot(), cfg).unwrap();
        // Nearest to (1,1) is node 1 alone.
        assert_eq!(field.interpolated_risk(Position::new(1.0, 1.0)).unwrap(), 0.1);
    }

    #[test]
    fn result_stays_in_unit_range() {
        let field = RiskField::from_snapshot(&super::helpers::square_snapshot(), IdwConfig::default())
            .unwrap();
        for &(x, y) in &[(3.0, 7.0), (-50.0, 20.0), (5.0, 5.0), (1e6, -1e6)] {
            let r = field.interpolated_risk(Position::new(x, y)).unwrap();
            assert!((0.0..=1.0).contains(&r), "({x},{y}) → {r}");
        }
    }

    #[test]
    fn point_samples_participate() {
        let mut s = RiskSnapshot::new(0);
        s.insert_point(Position::new(0.0, 0.0), 0.6);
        let field = RiskField::from_snapshot(&s, IdwConfig::default()).unwrap();
        let r = field.interpolated_risk(Position::new(3.0, 4.0)).unwrap();
        assert!((r - 0.6).abs() < 1e-12, "got {r}");
        assert_eq!(field.node_sample_count(), 0);
    }

    #[test]
    fn empty_field_errors() {
        let field = RiskField::default();
        assert!(field.is_empty());
        assert!(matches!(
            field.interpolated_risk(Position::new(0.0, 0.0)),
            Err(RiskError::EmptyField)
        ));
    }

    #[test]
    fn edge_only_snapshot_cannot_interpolate() {
        let mut s = RiskSnapshot::new(0);
        s.insert_edge(sr_core::EdgeId(1), sr_core::NodeId(1), sr_core::NodeId(2), 0.4);
        let field = RiskField::from_snapshot(&s, IdwConfig::default()).unwrap();
        assert!(matches!(
            field.interpolated_risk(Position::new(0.0, 0.0)),
            Err(RiskError::EmptyField)
        ));
    }

    #[test]
    fn nearest_samples_ordered() {
        let field = RiskField::from_snapshot(&super::helpers::square_snapshot(), IdwConfig::default())
            .unwrap();
        let near = field.nearest_samples(Position::new(9.0, 9.5), 2);
        assert_eq!(near.len(), 2);
        assert_eq!(near[0].risk, 0.4);
    }
}

// ── Zones & route risk ────────────────────────────────────────────────────────

#[cfg(test)]
mod zones {
    use sr_core::{IdwConfig, NodeId};

    use crate::{RiskError, RiskField};

    fn field() -> RiskField {
        RiskField::from_snapshot(&super::helpers::square_snapshot(), IdwConfig::default()).unwrap()
    }

    #[test]
    fn safe_and_danger_partition_nodes() {
        let f = field();
        assert_eq!(f.find_safe_zones(0.35), vec![NodeId(1), NodeId(2)]);
        assert_eq!(f.find_danger_zones(0.35), vec![NodeId(3), NodeId(4)]);
        // Threshold equal to a risk puts that node in the danger set.
        assert_eq!(f.find_danger_zones(0.9), vec![NodeId(3)]);
        assert!(!f.find_safe_zones(0.9).contains(&NodeId(3)));
    }

    #[test]
    fn route_risk_is_length_weighted() {
        let f = field();
        // 1→2 (len 10, mean 0.2), 2→4 (len 10, mean 0.35) → 0.275
        let r = f.route_risk(&[NodeId(1), NodeId(2), NodeId(4)]).unwrap();
        assert!((r - 0.275).abs() < 1e-12, "got {r}");
    }

    #[test]
    fn route_risk_single_node() {
        assert_eq!(field().route_risk(&[NodeId(3)]).unwrap(), 0.9);
    }

    #[test]
    fn route_risk_unknown_node() {
        assert!(matches!(
            field().route_risk(&[NodeId(1), NodeId(77)]),
            Err(RiskError::UnknownNode(NodeId(77)))
        ));
    }

    #[test]
    fn route_risk_empty_path() {
        assert!(field().route_risk(&[]).is_err());
    }
}

// ── Incidents & heatmap ───────────────────────────────────────────────────────

#[cfg(test)]
mod heatmap {
    use sr_core::{NodeId, Position};

    use crate::{
        aggregate_zones, severity_weight, snapshot_from_incidents, Incident, RiskError, ThreatLevel,
    };

    fn incident(id: &str, x: f64, y: f64, level: ThreatLevel, score: f64) -> Incident {
        Incident { id: id.into(), position: Position::new(x, y), level, score }
    }

    #[test]
    fn severity_weight_formula() {
        assert!((severity_weight(ThreatLevel::Low, 0.5) - 0.35).abs() < 1e-12);
        assert!((severity_weight(ThreatLevel::High, 0.5) - 0.55).abs() < 1e-12);
        // Score clamps to 1 and the sum clamps to 0.99.
        assert_eq!(severity_weight(ThreatLevel::Critical, 3.0), 0.99);
        assert_eq!(severity_weight(ThreatLevel::Low, -2.0), 0.0);
        assert_eq!(severity_weight(ThreatLevel::Medium, f64::NAN), 0.10);
    }

    #[test]
    fn threat_level_parse() {
        assert_eq!("high".parse::<ThreatLevel>().unwrap(), ThreatLevel::High);
        assert_eq!(" CRITICAL ".parse::<ThreatLevel>().unwrap(), ThreatLevel::Critical);
        assert!(matches!("severe".parse::<ThreatLevel>(), Err(RiskError::Parse(_))));
    }

    #[test]
    fn proximity_decay() {
        // severity = 0.5·0.7 + 0.2 = 0.55; node at distance 150 of radius 300 → 0.275
        let incidents = [incident("a", 0.0, 0.0, ThreatLevel::High, 0.5)];
        let nodes = [
            (NodeId(1), Position::new(150.0, 0.0)),
            (NodeId(2), Position::new(1_000.0, 0.0)),
        ];
        let snap = snapshot_from_incidents(nodes, &incidents, 300.0, 42).unwrap();
        assert!((snap.nodes[&NodeId(1)].risk - 0.275).abs() < 1e-12);
        assert_eq!(snap.nodes[&NodeId(2)].risk, 0.0);
        assert_eq!(snap.timestamp_unix_secs, 42);
    }

    #[test]
    fn accumulated_risk_saturates_at_one() {
        let incidents: Vec<_> = (0..5)
            .map(|i| incident(&format!("c{i}"), 0.0, 0.0, ThreatLevel::Critical, 1.0))
            .collect();
        let snap = snapshot_from_incidents([(NodeId(1), Position::new(0.0, 0.0))], &incidents, 100.0, 0)
            .unwrap();
        assert_eq!(snap.nodes[&NodeId(1)].risk, 1.0);
        assert!(snap.validate().is_ok());
    }

    #[test]
    fn bad_radius_rejected() {
        let r = snapshot_from_incidents(Vec::new(), &[], 0.0, 0);
        assert!(matches!(r, Err(RiskError::InvalidParameter(_))));
    }

    #[test]
    fn zones_grouped_and_sorted() {
        let incidents = [
            incident("a", 1.0, 1.0, ThreatLevel::Low, 0.2),   // cell (0,0)
            incident("b", -1.0, 2.0, ThreatLevel::Low, 0.4),  // cell (0,0)
            incident("c", 52.0, 0.0, ThreatLevel::Critical, 0.9), // cell (1,0)
        ];
        let zones = aggregate_zones(&incidents, 50.0).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].center, Position::new(50.0, 0.0));
        assert_eq!(zones[0].count, 1);
        assert_eq!(zones[1].count, 2);
        assert!((zones[1].mean_weight - 0.21).abs() < 1e-12);
        assert!((zones[1].total_weight - 0.42).abs() < 1e-12);
        assert_eq!(zones[1].to_point_sample().position, Position::new(0.0, 0.0));
    }

    #[test]
    fn zero_step_rejected() {
        assert!(aggregate_zones(&[], 0.0).is_err());
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use crate::{load_incidents_csv, load_incidents_reader, RiskError, ThreatLevel};

    const CSV: &str = "\
incident_id,x,y,threat_level,threat_score
INC_001,120.5,-40.0,HIGH,0.82
INC_002,300.0,15.2,low,0.10
";

    #[test]
    fn reads_rows() {
        let incidents = load_incidents_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].id, "INC_001");
        assert_eq!(incidents[0].level, ThreatLevel::High);
        assert_eq!(incidents[1].position.y, 15.2);
    }

    #[test]
    fn bad_level_reports_row() {
        let csv = "incident_id,x,y,threat_level,threat_score\nX,0,0,EXTREME,0.5\n";
        match load_incidents_reader(Cursor::new(csv)) {
            Err(RiskError::Parse(msg)) => assert!(msg.contains("row 1"), "{msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn bad_level_message_is_not_nested() {
        let csv = "incident_id,x,y,threat_level,threat_score\nX,0,0,EXTREME,0.5\n";
        let err = load_incidents_reader(Cursor::new(csv)).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("parse error: row 1: invalid threat level"), "{text}");
        assert_eq!(text.matches("parse error").count(), 1, "{text}");
    }

    #[test]
    fn malformed_number_is_csv_error() {
        let csv = "incident_id,x,y,threat_level,threat_score\nX,abc,0,LOW,0.5\n";
        assert!(matches!(load_incidents_reader(Cursor::new(csv)), Err(RiskError::Csv(_))));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let incidents = load_incidents_csv(file.path()).unwrap();
        assert_eq!(incidents.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let r = load_incidents_csv(std::path::Path::new("/definitely/not/here.csv"));
        assert!(matches!(r, Err(RiskError::Io(_))));
    }
}

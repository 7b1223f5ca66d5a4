//! harbor_walk — end-to-end demo of the SafeRoute planning engine.
//!
//! Plans a late-evening walk from the ferry terminal to a hotel across a
//! synthetic 6 × 6 harbour-district grid.  Incident reports (a fixed CSV
//! plus seeded random noise) become a risk snapshot; a second, escalated
//! snapshot shows the route moving away from a new hotspot.
//!
//! Usage: `harbor_walk [engine_config.json]`.  Missing fields fall back to
//! their defaults.  Set `RUST_LOG=debug` for engine internals.

mod network;

use std::io::Cursor;
use std::path::Path as FsPath;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use sr_core::{EngineConfig, Position};
use sr_planner::{Path, SafeRouteEngine};
use sr_risk::{
    aggregate_zones, load_incidents_reader, snapshot_from_incidents, Incident, RiskSnapshot,
    ThreatLevel,
};

use network::{build_network, node_id, GRID_SIDE};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:              u64   = 42;
const NOISE_INCIDENTS:   usize = 12;
const INCIDENT_RADIUS_M: f64   = 250.0;
const ZONE_STEP_M:       f64   = 200.0;
const ALTERNATIVES:      usize = 3;
const EVENING_UNIX_SECS: i64   = 1_700_000_000;
const NIGHT_UNIX_SECS:   i64   = EVENING_UNIX_SECS + 3 * 3_600;

// Reported incidents, planar metres from the grid origin.
const INCIDENTS_CSV: &str = "\
incident_id,x,y,threat_level,threat_score\n\
inc-001,150.0,320.0,HIGH,0.80\n\
inc-002,430.0,170.0,MEDIUM,0.55\n\
inc-003,600.0,660.0,LOW,0.30\n\
inc-004,290.0,500.0,CRITICAL,0.90\n\
";

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(FsPath::new(&path))?,
        None => EngineConfig::default(),
    };

    println!("=== harbor_walk — SafeRoute planning engine ===");
    println!(
        "Grid: {GRID_SIDE} × {GRID_SIDE}  |  Penalty: {}  |  Seed: {SEED}",
        config.penalty_factor
    );
    println!();

    // 1. Topology.
    let network = build_network(config.penalty_factor)?;
    let positions: Vec<_> = network.nodes().map(|n| (n.id, n.position)).collect();
    let ferry = node_id(0, 0);
    let hotel = node_id(GRID_SIDE - 1, GRID_SIDE - 1);
    let engine = SafeRouteEngine::new(network, config)?;
    let stats = engine.graph_stats()?;
    println!(
        "Road network: {} nodes, {} edges, {:.0} m of street, connected: {}",
        stats.node_count, stats.edge_count, stats.total_distance, stats.is_connected
    );

    // 2. Evening incidents.
    let mut incidents = load_incidents_reader(Cursor::new(INCIDENTS_CSV))?;
    incidents.extend(noise_incidents(SEED, NOISE_INCIDENTS));
    println!("Loaded {} incident reports", incidents.len());

    let zones = aggregate_zones(&incidents, ZONE_STEP_M)?;
    println!("Hottest zones:");
    for zone in zones.iter().take(3) {
        println!(
            "  {}  mean {:.2}  ({} reports)",
            zone.center, zone.mean_weight, zone.count
        );
    }
    println!();

    let evening = incident_snapshot(&positions, &incidents, EVENING_UNIX_SECS)?;
    let t0 = Instant::now();
    engine.refresh(&evening)?;
    println!("Evening refresh in {:.3} ms", t0.elapsed().as_secs_f64() * 1e3);
    report(&engine, "Evening", engine.safest_path(ferry, hotel)?)?;

    // 3. Alternatives.
    println!("{:<6} {:>10} {:>10} {:>8}  Route", "Rank", "Cost", "Dist (m)", "Risk");
    println!("{}", "-".repeat(60));
    for (rank, path) in engine.k_safest_paths(ferry, hotel, ALTERNATIVES)?.iter().enumerate() {
        println!(
            "{:<6} {:>10.1} {:>10.1} {:>8.3}  {}",
            rank + 1,
            path.total_cost,
            path.total_distance,
            path.total_risk,
            route_label(&engine, path)
        );
    }
    println!();

    // 4. A fight breaks out near the waterfront; the promenade turns critical.
    incidents.push(Incident {
        id:       "inc-night-1".into(),
        position: Position::new(360.0, 10.0),
        level:    ThreatLevel::Critical,
        score:    0.95,
    });
    let night = incident_snapshot(&positions, &incidents, NIGHT_UNIX_SECS)?;
    engine.refresh(&night)?;
    report(&engine, "Night", engine.safest_path(ferry, hotel)?)?;

    // 5. Free positions snap to the nearest intersections.
    let path = engine.safest_path_between(Position::new(20.0, -15.0), Position::new(700.0, 820.0))?;
    println!(
        "Snapped query: {} → {} over {} segments",
        path.start(),
        path.end(),
        path.edge_count()
    );

    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_config(path: &FsPath) -> Result<EngineConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Low-level noise scattered over the district.
fn noise_incidents(seed: u64, count: usize) -> Vec<Incident> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|i| Incident {
            id:       format!("noise-{i:03}"),
            position: Position::new(rng.gen_range(0.0..720.0), rng.gen_range(0.0..840.0)),
            level:    if rng.gen_bool(0.25) { ThreatLevel::Medium } else { ThreatLevel::Low },
            score:    rng.gen_range(0.05..0.35),
        })
        .collect()
}

fn incident_snapshot(
    positions: &[(sr_core::NodeId, Position)],
    incidents: &[Incident],
    timestamp_unix_secs: i64,
) -> Result<RiskSnapshot> {
    Ok(snapshot_from_incidents(
        positions.iter().copied(),
        incidents,
        INCIDENT_RADIUS_M,
        timestamp_unix_secs,
    )?)
}

fn route_label(engine: &SafeRouteEngine, path: &Path) -> String {
    engine.with_network(|net| {
        path.nodes
            .iter()
            .map(|&id| net.node(id).map(|n| n.name.clone()).unwrap_or_else(|_| id.to_string()))
            .collect::<Vec<_>>()
            .join(" → ")
    })
}

fn report(engine: &SafeRouteEngine, label: &str, path: Path) -> Result<()> {
    let safety = engine.analyze(&path);
    let minutes = engine.travel_time_minutes(&path)?;
    println!("{label} route: {}", route_label(engine, &path));
    println!(
        "  cost {:.1}  |  {:.0} m  |  ~{:.1} min  |  total risk {:.3}  |  max {:.2}  |  {:?}",
        path.total_cost,
        path.total_distance,
        minutes,
        safety.total_risk,
        safety.max_risk,
        safety.status
    );
    for seg in safety.segments.iter().filter(|s| s.flagged) {
        println!("  ! {} {} → {} risk {:.2} ({})", seg.edge, seg.from, seg.to, seg.risk, seg.level);
    }
    println!();
    Ok(())
}

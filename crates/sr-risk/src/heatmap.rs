//! Incident reports → risk data.
//!
//! Field reports (camera detections, user reports) carry a qualitative
//! threat level and a model score.  This module turns them into the two
//! shapes the rest of the engine consumes:
//!
//! - [`snapshot_from_incidents`]: per-node risk with linear proximity decay,
//!   ready for [`RiskField::load`](crate::RiskField::load).
//! - [`aggregate_zones`]: grid-snapped heatmap zones for display and for
//!   free point samples.

use std::collections::BTreeMap;
use std::str::FromStr;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use sr_core::{NodeId, Position};

use crate::snapshot::{PointRiskSample, RiskSnapshot};
use crate::{RiskError, RiskResult};

// ── ThreatLevel ───────────────────────────────────────────────────────────────

/// Qualitative severity attached to an incident report.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThreatLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    /// Additive boost applied on top of the scaled model score.
    pub fn boost(self) -> f64 {
        match self {
            ThreatLevel::Low      => 0.0,
            ThreatLevel::Medium   => 0.10,
            ThreatLevel::High     => 0.20,
            ThreatLevel::Critical => 0.35,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThreatLevel::Low      => "LOW",
            ThreatLevel::Medium   => "MEDIUM",
            ThreatLevel::High     => "HIGH",
            ThreatLevel::Critical => "CRITICAL",
        }
    }
}

impl FromStr for ThreatLevel {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW"      => Ok(ThreatLevel::Low),
            "MEDIUM"   => Ok(ThreatLevel::Medium),
            "HIGH"     => Ok(ThreatLevel::High),
            "CRITICAL" => Ok(ThreatLevel::Critical),
            other => Err(RiskError::Parse(format!(
                "invalid threat level {other:?}: expected LOW, MEDIUM, HIGH, or CRITICAL"
            ))),
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bound of a single incident's weight.  Keeps one report from
/// saturating a node on its own.
const MAX_SEVERITY: f64 = 0.99;

/// Weight of one incident: 70 % of the clamped model score plus the level
/// boost, clamped to `[0, 0.99]`.
pub fn severity_weight(level: ThreatLevel, score: f64) -> f64 {
    let base = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
    (base * 0.7 + level.boost()).clamp(0.0, MAX_SEVERITY)
}

// ── Incident ──────────────────────────────────────────────────────────────────

/// A single incident report placed in the planar frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Incident {
    pub id:       String,
    pub position: Position,
    pub level:    ThreatLevel,
    /// Model threat score, nominally in `[0, 1]`.
    pub score:    f64,
}

impl Incident {
    #[inline]
    pub fn severity(&self) -> f64 {
        severity_weight(self.level, self.score)
    }
}

#[derive(Clone)]
struct IncidentEntry {
    point:    [f64; 2],
    severity: f64,
}

impl RTreeObject for IncidentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IncidentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Incident → snapshot ───────────────────────────────────────────────────────

/// Build a node-keyed snapshot from incident reports.
///
/// Each node's risk is `min(1, Σ severity · (1 − d / radius_m))` over the
/// incidents within `radius_m`; nodes with no nearby incident
/// get risk 0.  Incidents with non-finite positions are skipped.
pub fn snapshot_from_incidents<I>(
    nodes: I,
    incidents: &[Incident],
    radius_m: f64,
    timestamp_unix_secs: i64,
) -> RiskResult<RiskSnapshot>
where
    I: IntoIterator<Item = (NodeId, Position)>,
{
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(RiskError::InvalidParameter(format!(
            "incident radius must be > 0, got {radius_m}"
        )));
    }

    let entries: Vec<IncidentEntry> = incidents
        .iter()
        .filter(|inc| inc.position.is_finite())
        .map(|inc| IncidentEntry { point: inc.position.to_array(), severity: inc.severity() })
        .collect();
    let index = RTree::bulk_load(entries);
    let radius_2 = radius_m * radius_m;

    let mut snapshot = RiskSnapshot::new(timestamp_unix_secs);
    for (node, position) in nodes {
        let query = position.to_array();
        let total: f64 = index
            .locate_within_distance(query, radius_2)
            .map(|e| {
                let d = e.distance_2(&query).sqrt();
                e.severity * (1.0 - d / radius_m).max(0.0)
            })
            .sum();
        snapshot.insert_node(node, position, total.min(1.0));
    }
    snapshot.validate()?;
    Ok(snapshot)
}

// ── Zone aggregation ──────────────────────────────────────────────────────────

/// One grid cell of the incident heatmap.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskZone {
    /// Grid-snapped centre of the cell.
    pub center:       Position,
    /// Sum of incident severities in the cell.
    pub total_weight: f64,
    /// Mean incident severity in the cell; always in `[0, 0.99]`.
    pub mean_weight:  f64,
    pub count:        usize,
}

impl RiskZone {
    /// Zone as a free interpolation sample carrying its mean weight.
    pub fn to_point_sample(&self) -> PointRiskSample {
        PointRiskSample { position: self.center, risk: self.mean_weight }
    }
}

/// Snap incidents to a square grid of side `step` and summarise each cell.
///
/// Zones come back sorted by mean weight, highest first; equal means are
/// ordered by cell position so the output is deterministic.
pub fn aggregate_zones(incidents: &[Incident], step: f64) -> RiskResult<Vec<RiskZone>> {
    if !step.is_finite() || step <= 0.0 {
        return Err(RiskError::InvalidParameter(format!("zone step must be > 0, got {step}")));
    }

    let mut cells: BTreeMap<(i64, i64), (f64, usize)> = BTreeMap::new();
    for inc in incidents.iter().filter(|inc| inc.position.is_finite()) {
        let key = (
            (inc.position.x / step).round() as i64,
            (inc.position.y / step).round() as i64,
        );
        let cell = cells.entry(key).or_insert((0.0, 0));
        cell.0 += inc.severity();
        cell.1 += 1;
    }

    let mut zones: Vec<((i64, i64), RiskZone)> = cells
        .into_iter()
        .map(|(key, (sum, count))| {
            let zone = RiskZone {
                center:       Position::new(key.0 as f64 * step, key.1 as f64 * step),
                total_weight: sum,
                mean_weight:  sum / count as f64,
                count,
            };
            (key, zone)
        })
        .collect();

    zones.sort_by(|(ka, a), (kb, b)| {
        b.mean_weight.total_cmp(&a.mean_weight).then_with(|| ka.cmp(kb))
    });
    Ok(zones.into_iter().map(|(_, z)| z).collect())
}

//! Interpolated risk field.
//!
//! # Interpolation
//!
//! Risk at an arbitrary position is estimated by inverse-distance weighting
//! over the `k` nearest positioned samples:
//!
//! ```text
//! w_i  = 1 / d_i^p
//! risk = Σ(w_i · risk_i) / Σ(w_i)
//! ```
//!
//! A query that lands exactly on a sample returns that sample's risk
//! unchanged, which is also what keeps `d_i = 0` out of the division.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds every positioned sample (node samples and
//! free point samples), so a k-nearest query touches O(log n + k) entries
//! instead of scanning the whole snapshot.

use std::collections::BTreeMap;

use log::debug;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use sr_core::{EdgeId, IdwConfig, NodeId, Position};

use crate::snapshot::{EdgeRiskSample, RiskSnapshot};
use crate::{RiskError, RiskResult};

// ── Samples ───────────────────────────────────────────────────────────────────

/// What a positioned sample belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleOwner {
    Node(NodeId),
    Edge(EdgeId),
}

/// One risk observation at a known position.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskSample {
    pub position: Position,
    pub risk:     f64,
    /// `None` for free-floating point samples.
    pub owner:    Option<SampleOwner>,
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct SampleEntry {
    point:  [f64; 2],
    sample: RiskSample,
}

impl RTreeObject for SampleEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SampleEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RiskField ─────────────────────────────────────────────────────────────────

/// Repository of the current risk samples with interpolation.
///
/// The field is immutable between loads.  Share it behind an `Arc` and
/// replace the whole handle on refresh rather than mutating in place.
pub struct RiskField {
    config:       IdwConfig,
    nodes:        BTreeMap<NodeId, RiskSample>,
    edges:        BTreeMap<EdgeId, EdgeRiskSample>,
    index:        RTree<SampleEntry>,
    timestamp_unix_secs: i64,
}

impl RiskField {
    /// An empty field.  Every interpolation query fails with
    /// [`RiskError::EmptyField`] until a snapshot is loaded.
    pub fn new(config: IdwConfig) -> Self {
        Self {
            config,
            nodes:  BTreeMap::new(),
            edges:  BTreeMap::new(),
            index:  RTree::new(),
            timestamp_unix_secs: 0,
        }
    }

    /// Build a field directly from a snapshot.
    pub fn from_snapshot(snapshot: &RiskSnapshot, config: IdwConfig) -> RiskResult<Self> {
        let mut field = Self::new(config);
        field.load(snapshot)?;
        Ok(field)
    }

    /// Replace every sample with the contents of `snapshot`.
    ///
    /// All-or-nothing: if any value is out of range the error is returned and
    /// the previously loaded samples stay in place.
    pub fn load(&mut self, snapshot: &RiskSnapshot) -> RiskResult<()> {
        snapshot.validate()?;

        let nodes: BTreeMap<NodeId, RiskSample> = snapshot
            .nodes
            .iter()
            .map(|(&id, s)| {
                let sample = RiskSample {
                    position: s.position,
                    risk:     s.risk,
                    owner:    Some(SampleOwner::Node(id)),
                };
                (id, sample)
            })
            .collect();

        // Bulk-load for O(N log N) construction (faster than N inserts).
        let entries: Vec<SampleEntry> = nodes
            .values()
            .copied()
            .chain(snapshot.points.iter().map(|p| RiskSample {
                position: p.position,
                risk:     p.risk,
                owner:    None,
            }))
            .map(|sample| SampleEntry { point: sample.position.to_array(), sample })
            .collect();

        debug!(
            "loading risk snapshot @{}: {} node, {} edge, {} point samples",
            snapshot.timestamp_unix_secs,
            nodes.len(),
            snapshot.edges.len(),
            snapshot.points.len()
        );

        self.index = RTree::bulk_load(entries);
        self.nodes = nodes;
        self.edges = snapshot.edges.clone();
        self.timestamp_unix_secs = snapshot.timestamp_unix_secs;
        Ok(())
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn config(&self) -> &IdwConfig {
        &self.config
    }

    pub fn timestamp_unix_secs(&self) -> i64 {
        self.timestamp_unix_secs
    }

    pub fn node_sample_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_sample_count(&self) -> usize {
        self.edges.len()
    }

    /// `true` if there is nothing to interpolate from.
    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }

    // ── Exact lookups ─────────────────────────────────────────────────────

    /// Risk sampled at `node`.
    pub fn node_risk(&self, node: NodeId) -> RiskResult<f64> {
        self.nodes
            .get(&node)
            .map(|s| s.risk)
            .ok_or(RiskError::UnknownNode(node))
    }

    pub fn node_sample(&self, node: NodeId) -> Option<&RiskSample> {
        self.nodes.get(&node)
    }

    /// Risk sampled for `edge`, if the snapshot carried one.
    pub fn edge_risk(&self, edge: EdgeId) -> Option<f64> {
        self.edges.get(&edge).map(|s| s.risk)
    }

    pub fn edge_sample(&self, edge: EdgeId) -> Option<&EdgeRiskSample> {
        self.edges.get(&edge)
    }

    /// All node samples in ascending id order.
    pub fn node_samples(&self) -> impl Iterator<Item = (NodeId, &RiskSample)> + '_ {
        self.nodes.iter().map(|(&id, s)| (id, s))
    }

    // ── Interpolation ─────────────────────────────────────────────────────

    /// IDW estimate of the risk at `position`.
    pub fn interpolated_risk(&self, position: Position) -> RiskResult<f64> {
        if !position.is_finite() {
            return Err(RiskError::InvalidPosition { owner: format!("query {position}") });
        }

        let mut weighted = 0.0;
        let mut total_w  = 0.0;
        let half_power = self.config.power * 0.5;

        for (entry, d2) in self
            .index
            .nearest_neighbor_iter_with_distance_2(&position.to_array())
            .take(self.config.k.max(1))
        {
            // d^p = (d²)^(p/2); a subnormal d² overflows the weight.
            let w = 1.0 / d2.powf(half_power);
            if d2 == 0.0 || !w.is_finite() {
                return Ok(entry.sample.risk);
            }
            weighted += w * entry.sample.risk;
            total_w  += w;
        }

        if total_w == 0.0 {
            return Err(RiskError::EmptyField);
        }
        // Clamp only absorbs rounding; a weighted mean of [0, 1] values stays in range.
        Ok((weighted / total_w).clamp(0.0, 1.0))
    }

    /// Up to `k` nearest positioned samples, closest first.
    pub fn nearest_samples(&self, position: Position, k: usize) -> Vec<RiskSample> {
        self.index
            .nearest_neighbor_iter(&position.to_array())
            .take(k)
            .map(|e| e.sample)
            .collect()
    }

    // ── Zones ─────────────────────────────────────────────────────────────

    /// Nodes whose sampled risk is strictly below `threshold`, ascending id.
    pub fn find_safe_zones(&self, threshold: f64) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, s)| s.risk < threshold)
            .map(|(&id, _)| id)
            .collect()
    }

    /// Nodes whose sampled risk is at or above `threshold`, ascending id.
    pub fn find_danger_zones(&self, threshold: f64) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, s)| s.risk >= threshold)
            .map(|(&id, _)| id)
            .collect()
    }

    // ── Route aggregate ───────────────────────────────────────────────────

    /// Length-weighted mean risk along a node sequence.
    ///
    /// Each hop contributes the mean of its endpoint risks weighted by the
    /// straight-line distance between the two samples:
    ///
    /// ```text
    /// route_risk = Σ(len_i · (r_a + r_b)/2) / Σ len_i
    /// ```
    ///
    /// A single-node path returns that node's risk.  If every hop has zero
    /// length the hops are weighted equally.  Fails with
    /// [`RiskError::UnknownNode`] for a node without a sample and with
    /// [`RiskError::InvalidParameter`] for an empty path.
    pub fn route_risk(&self, path: &[NodeId]) -> RiskResult<f64> {
        let samples = path
            .iter()
            .map(|&id| self.nodes.get(&id).ok_or(RiskError::UnknownNode(id)))
            .collect::<RiskResult<Vec<_>>>()?;

        match samples.as_slice() {
            [] => Err(RiskError::InvalidParameter("route_risk of an empty path".into())),
            [only] => Ok(only.risk),
            _ => {
                let mut weighted = 0.0;
                let mut length   = 0.0;
                let mut plain    = 0.0;
                for pair in samples.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    let hop_risk = (a.risk + b.risk) * 0.5;
                    let hop_len  = a.position.distance(b.position);
                    weighted += hop_len * hop_risk;
                    length   += hop_len;
                    plain    += hop_risk;
                }
                if length > 0.0 {
                    Ok(weighted / length)
                } else {
                    Ok(plain / (samples.len() - 1) as f64)
                }
            }
        }
    }
}

impl Default for RiskField {
    fn default() -> Self {
        Self::new(IdwConfig::default())
    }
}

impl std::fmt::Debug for RiskField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskField")
            .field("config", &self.config)
            .field("node_samples", &self.nodes.len())
            .field("edge_samples", &self.edges.len())
            .field("indexed", &self.index.size())
            .field("timestamp_unix_secs", &self.timestamp_unix_secs)
            .finish()
    }
}

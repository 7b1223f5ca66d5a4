//! Per-segment safety diagnostics.

use sr_core::{EdgeId, NodeId, RiskLevel};

use crate::{Path, RoutePlanner};

/// Overall verdict for a route.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SafetyStatus {
    /// No segment at or above the `high` threshold.
    Safe,
    /// At least one flagged segment.
    Caution,
}

/// Classification of one path segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentAssessment {
    pub edge:    EdgeId,
    pub from:    NodeId,
    pub to:      NodeId,
    pub risk:    f64,
    pub level:   RiskLevel,
    pub flagged: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SafetyReport {
    pub segments:   Vec<SegmentAssessment>,
    /// Edges of flagged segments, in travel order.
    pub flagged:    Vec<EdgeId>,
    /// Segment count per level, indexed like [`RiskLevel::ALL`].
    pub counts:     [usize; 4],
    pub max_risk:   f64,
    pub total_risk: f64,
    pub status:     SafetyStatus,
}

impl SafetyReport {
    pub fn count(&self, level: RiskLevel) -> usize {
        self.counts[level as usize]
    }

    pub fn is_safe(&self) -> bool {
        self.status == SafetyStatus::Safe
    }
}

impl RoutePlanner {
    /// Classify every segment of `path` against the planner's thresholds and
    /// flag those at or above `high`.
    pub fn analyze_route_safety(&self, path: &Path) -> SafetyReport {
        let segments: Vec<SegmentAssessment> = path
            .segments
            .iter()
            .map(|s| {
                let level = self.thresholds.classify(s.risk);
                SegmentAssessment {
                    edge: s.edge,
                    from: s.from,
                    to: s.to,
                    risk: s.risk,
                    level,
                    flagged: level.is_flagged(),
                }
            })
            .collect();

        let mut counts = [0usize; 4];
        for s in &segments {
            counts[s.level as usize] += 1;
        }
        let flagged: Vec<EdgeId> = segments.iter().filter(|s| s.flagged).map(|s| s.edge).collect();
        let max_risk = segments.iter().map(|s| s.risk).fold(0.0, f64::max);
        let status = if flagged.is_empty() { SafetyStatus::Safe } else { SafetyStatus::Caution };

        SafetyReport { segments, flagged, counts, max_risk, total_risk: path.total_risk, status }
    }
}

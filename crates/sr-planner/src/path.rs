//! Route results.
//!
//! # Total risk
//!
//! A path's `total_risk` is its length-weighted mean segment risk:
//!
//! ```text
//! total_risk = Σ(risk_i × distance_i) / Σ distance_i
//! ```
//!
//! It is dimensionless and stays in `[0, 1]`, so paths of different lengths
//! compare directly.  A trivial path (start == end) has total risk 0.

use sr_core::{EdgeId, NodeId};
use sr_network::WeightedRoadNetwork;

use crate::PlanResult;

/// One traversed edge, oriented in travel direction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathSegment {
    pub edge:     EdgeId,
    pub from:     NodeId,
    pub to:       NodeId,
    pub distance: f64,
    pub risk:     f64,
    pub cost:     f64,
}

/// An ordered route through the network.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Visited nodes, start first.  Always `segments.len() + 1` entries.
    pub nodes:          Vec<NodeId>,
    pub segments:       Vec<PathSegment>,
    pub total_cost:     f64,
    pub total_distance: f64,
    pub total_risk:     f64,
}

/// A single hop found by the search, before edge attributes are attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Hop {
    pub edge: EdgeId,
    pub from: NodeId,
    pub to:   NodeId,
}

impl Path {
    /// Zero-length path at `node`.
    pub fn trivial(node: NodeId) -> Self {
        Self::from_segments(node, Vec::new())
    }

    /// Assemble a path from consecutive segments starting at `start`.
    ///
    /// Totals are summed front to back, so two paths with the same segments
    /// always carry bit-identical totals.
    pub fn from_segments(start: NodeId, segments: Vec<PathSegment>) -> Self {
        let mut nodes = Vec::with_capacity(segments.len() + 1);
        nodes.push(start);
        let (mut total_cost, mut total_distance, mut weighted_risk) = (0.0, 0.0, 0.0);
        for s in &segments {
            nodes.push(s.to);
            total_cost     += s.cost;
            total_distance += s.distance;
            weighted_risk  += s.risk * s.distance;
        }
        let total_risk = if total_distance > 0.0 { weighted_risk / total_distance } else { 0.0 };
        Self { nodes, segments, total_cost, total_distance, total_risk }
    }

    /// Attach current edge attributes from `network` to searched hops.
    pub(crate) fn from_hops(
        network: &WeightedRoadNetwork,
        start: NodeId,
        hops: &[Hop],
    ) -> PlanResult<Self> {
        let segments = hops
            .iter()
            .map(|h| {
                let e = network.edge(h.edge)?;
                Ok(PathSegment {
                    edge:     h.edge,
                    from:     h.from,
                    to:       h.to,
                    distance: e.distance,
                    risk:     e.risk(),
                    cost:     e.cost(),
                })
            })
            .collect::<PlanResult<Vec<_>>>()?;
        Ok(Self::from_segments(start, segments))
    }

    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn end(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn edge_count(&self) -> usize {
        self.segments.len()
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.segments.is_empty()
    }

    /// Traversed edge ids in order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.segments.iter().map(|s| s.edge)
    }
}

//! Point-in-time risk input handed to the engine by the backend.
//!
//! A snapshot is plain data: building one never fails.  Range checks happen
//! once, in [`RiskSnapshot::validate`], which [`RiskField::load`] calls before
//! touching any existing state.
//!
//! [`RiskField::load`]: crate::RiskField::load

use std::collections::BTreeMap;

use sr_core::{is_valid_risk, EdgeId, NodeId, Position};

use crate::{RiskError, RiskResult};

/// Risk observed at a road node.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRiskSample {
    pub position: Position,
    pub risk:     f64,
}

/// Risk observed along a road edge.
///
/// `from`/`to` mirror the edge's endpoints as the backend knows them; the
/// network resolves the sample by edge id.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeRiskSample {
    pub from: NodeId,
    pub to:   NodeId,
    pub risk: f64,
}

/// Risk observed at a free position not tied to any node (e.g. a heatmap
/// zone centre).  Participates in interpolation only.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointRiskSample {
    pub position: Position,
    pub risk:     f64,
}

/// Full risk picture at one instant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskSnapshot {
    pub nodes:  BTreeMap<NodeId, NodeRiskSample>,
    pub edges:  BTreeMap<EdgeId, EdgeRiskSample>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub points: Vec<PointRiskSample>,
    /// Unix timestamp (seconds) at which the backend captured the data.
    pub timestamp_unix_secs: i64,
}

impl RiskSnapshot {
    pub fn new(timestamp_unix_secs: i64) -> Self {
        Self { timestamp_unix_secs, ..Self::default() }
    }

    /// Insert or replace the sample for `node`.
    pub fn insert_node(&mut self, node: NodeId, position: Position, risk: f64) -> &mut Self {
        self.nodes.insert(node, NodeRiskSample { position, risk });
        self
    }

    /// Insert or replace the sample for `edge`.
    pub fn insert_edge(&mut self, edge: EdgeId, from: NodeId, to: NodeId, risk: f64) -> &mut Self {
        self.edges.insert(edge, EdgeRiskSample { from, to, risk });
        self
    }

    pub fn insert_point(&mut self, position: Position, risk: f64) -> &mut Self {
        self.points.push(PointRiskSample { position, risk });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.points.is_empty()
    }

    /// Total number of samples of all kinds.
    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len() + self.points.len()
    }

    /// Check every value; fails on the first risk outside `[0, 1]` or the
    /// first non-finite position.
    pub fn validate(&self) -> RiskResult<()> {
        for (id, s) in &self.nodes {
            check_risk(s.risk, || id.to_string())?;
            check_position(s.position, || id.to_string())?;
        }
        for (id, s) in &self.edges {
            check_risk(s.risk, || id.to_string())?;
        }
        for (i, s) in self.points.iter().enumerate() {
            check_risk(s.risk, || format!("point sample #{i}"))?;
            check_position(s.position, || format!("point sample #{i}"))?;
        }
        Ok(())
    }
}

fn check_risk(value: f64, owner: impl FnOnce() -> String) -> RiskResult<()> {
    if is_valid_risk(value) {
        Ok(())
    } else {
        Err(RiskError::InvalidRisk { owner: owner(), value })
    }
}

fn check_position(position: Position, owner: impl FnOnce() -> String) -> RiskResult<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(RiskError::InvalidPosition { owner: owner() })
    }
}

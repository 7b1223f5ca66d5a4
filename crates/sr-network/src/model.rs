//! Node and edge records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sr_core::{EdgeId, NodeId, Position};

/// Edge weight combining physical distance and risk.
///
/// `distance × (1 + penalty × risk)`.  With `risk ∈ [0, 1]` and
/// `penalty ≥ 0` the result is never below `distance`.
#[inline]
pub fn risk_cost(distance: f64, risk: f64, penalty: f64) -> f64 {
    distance * (1.0 + penalty * risk)
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// A road-network node: intersection, landmark, shelter, transit stop…
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id:       NodeId,
    pub position: Position,
    #[serde(default)]
    pub name:     String,
    /// Free-form type tag (`"intersection"`, `"police_station"`, …).
    #[serde(default)]
    pub kind:     String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Node {
    pub fn new(id: NodeId, position: Position) -> Self {
        Self {
            id,
            position,
            name:     String::new(),
            kind:     String::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// ── Edge ──────────────────────────────────────────────────────────────────────

/// A road segment between two nodes.
///
/// `risk` and `cost` are owned by the network: `risk` is set by
/// [`refresh_risk_costs`](crate::WeightedRoadNetwork::refresh_risk_costs) and
/// `cost` is always rederived from `distance`, `risk`, and the network's
/// penalty factor.  Neither is writable from outside this crate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id:        EdgeId,
    pub from:      NodeId,
    pub to:        NodeId,
    /// Physical length in metres.  Always finite and > 0.
    pub distance:  f64,
    /// `false` → traversable in both directions.
    #[serde(default)]
    pub directed:  bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<f64>,
    #[serde(default)]
    pub(crate) risk: f64,
    #[serde(skip)]
    pub(crate) cost: f64,
}

impl Edge {
    /// Undirected edge with no metadata and zero risk.
    pub fn new(id: EdgeId, from: NodeId, to: NodeId, distance: f64) -> Self {
        Self {
            id,
            from,
            to,
            distance,
            directed:  false,
            road_type: None,
            speed_kmh: None,
            risk:      0.0,
            cost:      distance,
        }
    }

    /// Make the edge one-way from `from` to `to`.
    pub fn one_way(mut self) -> Self {
        self.directed = true;
        self
    }

    pub fn with_road_type(mut self, road_type: impl Into<String>) -> Self {
        self.road_type = Some(road_type.into());
        self
    }

    pub fn with_speed_kmh(mut self, speed_kmh: f64) -> Self {
        self.speed_kmh = Some(speed_kmh);
        self
    }

    #[inline]
    pub fn risk(&self) -> f64 {
        self.risk
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Endpoint opposite `node`, or `None` if `node` is not an endpoint.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.from {
            Some(self.to)
        } else if node == self.to {
            Some(self.from)
        } else {
            None
        }
    }

    /// `true` if the edge joins `a` and `b`, in either orientation for an
    /// undirected edge.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.from == a && self.to == b) || (!self.directed && self.from == b && self.to == a)
    }
}

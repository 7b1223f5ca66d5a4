//! Road network representation and cost refresh.
//!
//! # Data layout
//!
//! Nodes and edges live in `BTreeMap`s keyed by their caller-supplied ids, so
//! every full scan (refresh, export, stats) visits them in ascending id order
//! and produces identical output for identical input.
//!
//! Traversal goes through an explicit adjacency index:
//!
//! ```text
//! adjacency[node] = [(neighbor, edge), …]   in insertion order
//! ```
//!
//! A directed edge contributes one entry (`from → to`); an undirected edge
//! contributes two.  Neighbour lookup is O(1) to find the list and O(degree)
//! to walk it, which is all Dijkstra's inner loop needs.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps positions to the nearest node.  Used to snap
//! free query positions (a user's location, an address lookup) onto the
//! network before routing.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use sr_core::{is_valid_risk, EdgeId, NodeId, Position};
use sr_risk::{RiskField, RiskResult};

use crate::model::{risk_cost, Edge, Node};
use crate::{NetworkError, NetworkResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a planar point with the
/// associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── WeightedRoadNetwork ───────────────────────────────────────────────────────

/// Road topology plus a derived cost per edge.
///
/// Topology is built once through [`add_node`](Self::add_node) /
/// [`add_edge`](Self::add_edge) and stays stable across risk refreshes.
/// Costs are recomputed in full by [`refresh_risk_costs`](Self::refresh_risk_costs)
/// and [`update_risk_penalty_factor`](Self::update_risk_penalty_factor).
#[derive(Clone)]
pub struct WeightedRoadNetwork {
    nodes:          BTreeMap<NodeId, Node>,
    edges:          BTreeMap<EdgeId, Edge>,
    adjacency:      FxHashMap<NodeId, Vec<(NodeId, EdgeId)>>,
    penalty_factor: f64,
    spatial_idx:    RTree<NodeEntry>,
}

/// Penalty used by [`WeightedRoadNetwork::default`].
pub const DEFAULT_PENALTY_FACTOR: f64 = 50.0;

impl WeightedRoadNetwork {
    /// Empty network with the given penalty factor.
    pub fn new(penalty_factor: f64) -> NetworkResult<Self> {
        check_penalty(penalty_factor)?;
        Ok(Self {
            nodes:          BTreeMap::new(),
            edges:          BTreeMap::new(),
            adjacency:      FxHashMap::default(),
            penalty_factor,
            spatial_idx:    RTree::new(),
        })
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn penalty_factor(&self) -> f64 {
        self.penalty_factor
    }

    // ── Topology construction ─────────────────────────────────────────────

    /// Add a node.  Fails with [`NetworkError::DuplicateNode`] if the id is
    /// taken; the network is unchanged on error.
    pub fn add_node(&mut self, node: Node) -> NetworkResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(NetworkError::DuplicateNode(node.id));
        }
        if !node.position.is_finite() {
            return Err(NetworkError::InvalidPosition(node.id));
        }
        self.spatial_idx.insert(NodeEntry { point: node.position.to_array(), id: node.id });
        self.adjacency.entry(node.id).or_default();
        self.nodes.insert(node.id, node);
        Ok(())
    }

    /// Add an edge and index it for traversal.
    ///
    /// Every check runs before anything is written, so a rejected edge
    /// leaves the node set, edge set, and adjacency index untouched.
    pub fn add_edge(&mut self, mut edge: Edge) -> NetworkResult<()> {
        for endpoint in [edge.from, edge.to] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(NetworkError::UnknownEndpoint { edge: edge.id, node: endpoint });
            }
        }
        if self.edges.contains_key(&edge.id) {
            return Err(NetworkError::DuplicateEdge(edge.id));
        }
        if !edge.distance.is_finite() || edge.distance <= 0.0 {
            return Err(NetworkError::InvalidDistance { edge: edge.id, distance: edge.distance });
        }
        if let Some(speed) = edge.speed_kmh {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(NetworkError::InvalidSpeed { edge: edge.id, speed_kmh: speed });
            }
        }
        if !is_valid_risk(edge.risk) {
            return Err(NetworkError::InvalidRisk { edge: edge.id, risk: edge.risk });
        }

        edge.cost = risk_cost(edge.distance, edge.risk, self.penalty_factor);

        self.adjacency.entry(edge.from).or_default().push((edge.to, edge.id));
        if !edge.directed {
            self.adjacency.entry(edge.to).or_default().push((edge.from, edge.id));
        }
        self.edges.insert(edge.id, edge);
        Ok(())
    }

    /// Convenience: add an undirected road segment.
    pub fn add_road(&mut self, id: EdgeId, a: NodeId, b: NodeId, distance: f64) -> NetworkResult<()> {
        self.add_edge(Edge::new(id, a, b, distance))
    }

    /// Convenience: add a one-way road segment from `from` to `to`.
    pub fn add_one_way(&mut self, id: EdgeId, from: NodeId, to: NodeId, distance: f64) -> NetworkResult<()> {
        self.add_edge(Edge::new(id, from, to, distance).one_way())
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> NetworkResult<&Node> {
        self.nodes.get(&id).ok_or(NetworkError::UnknownNode(id))
    }

    pub fn edge(&self, id: EdgeId) -> NetworkResult<&Edge> {
        self.edges.get(&id).ok_or(NetworkError::UnknownEdge(id))
    }

    /// All nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// All edges in ascending id order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    /// Outgoing `(neighbor, edge)` pairs of `node`, in insertion order.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> NetworkResult<&[(NodeId, EdgeId)]> {
        self.adjacency
            .get(&node)
            .map(Vec::as_slice)
            .ok_or(NetworkError::UnknownNode(node))
    }

    /// Out-degree of `node` (number of traversable outgoing entries).
    pub fn out_degree(&self, node: NodeId) -> NetworkResult<usize> {
        self.neighbors(node).map(<[_]>::len)
    }

    pub fn edge_cost(&self, id: EdgeId) -> NetworkResult<f64> {
        self.edge(id).map(Edge::cost)
    }

    pub fn edge_distance(&self, id: EdgeId) -> NetworkResult<f64> {
        self.edge(id).map(|e| e.distance)
    }

    pub fn edge_risk(&self, id: EdgeId) -> NetworkResult<f64> {
        self.edge(id).map(Edge::risk)
    }

    /// Edges with risk at or above `threshold`, ascending id.
    pub fn high_risk_edges(&self, threshold: f64) -> Vec<&Edge> {
        self.edges.values().filter(|e| e.risk >= threshold).collect()
    }

    /// Edges with risk strictly below `threshold`, ascending id.
    pub fn low_risk_edges(&self, threshold: f64) -> Vec<&Edge> {
        self.edges.values().filter(|e| e.risk < threshold).collect()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest node to `pos`.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: Position) -> Option<NodeId> {
        self.spatial_idx.nearest_neighbor(&pos.to_array()).map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: Position, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&pos.to_array())
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    // ── Cost refresh ──────────────────────────────────────────────────────

    /// Resolve every edge's risk from `field` and recompute every cost.
    ///
    /// An edge takes its own sample when the field has one; otherwise the
    /// IDW estimate at the midpoint of its endpoints.  All risks are resolved
    /// before any edge is written, so on error the network keeps its previous
    /// risks and costs.  Returns the number of edges updated.
    pub fn refresh_risk_costs(&mut self, field: &RiskField) -> NetworkResult<usize> {
        let resolved = self.resolve_risks(field)?;
        let penalty = self.penalty_factor;
        for (edge, risk) in self.edges.values_mut().zip(resolved) {
            edge.risk = risk;
            edge.cost = risk_cost(edge.distance, risk, penalty);
        }
        info!(
            "refreshed {} edge costs from risk snapshot @{} (penalty {})",
            self.edges.len(),
            field.timestamp_unix_secs(),
            penalty
        );
        Ok(self.edges.len())
    }

    /// Set the penalty factor and recompute every cost from the stored risks.
    pub fn update_risk_penalty_factor(&mut self, penalty_factor: f64) -> NetworkResult<()> {
        check_penalty(penalty_factor)?;
        self.penalty_factor = penalty_factor;
        for edge in self.edges.values_mut() {
            edge.cost = risk_cost(edge.distance, edge.risk, penalty_factor);
        }
        debug!("penalty factor set to {penalty_factor}; {} costs recomputed", self.edges.len());
        Ok(())
    }

    /// Risk for every edge, in ascending edge-id order.
    #[cfg(not(feature = "parallel"))]
    fn resolve_risks(&self, field: &RiskField) -> NetworkResult<Vec<f64>> {
        self.edges
            .values()
            .map(|e| self.resolve_edge_risk(e, field).map_err(NetworkError::from))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn resolve_risks(&self, field: &RiskField) -> NetworkResult<Vec<f64>> {
        use rayon::prelude::*;

        let edges: Vec<&Edge> = self.edges.values().collect();
        edges
            .par_iter()
            .map(|e| self.resolve_edge_risk(e, field).map_err(NetworkError::from))
            .collect()
    }

    fn resolve_edge_risk(&self, edge: &Edge, field: &RiskField) -> RiskResult<f64> {
        if let Some(sample) = field.edge_sample(edge.id) {
            if !edge.connects(sample.from, sample.to) && !edge.connects(sample.to, sample.from) {
                warn!(
                    "risk sample for {} names {}→{} but the edge joins {}→{}; using it by id",
                    edge.id, sample.from, sample.to, edge.from, edge.to
                );
            }
            return Ok(sample.risk);
        }
        // Both endpoints exist: add_edge checks them and nodes are never removed.
        let a = self.nodes[&edge.from].position;
        let b = self.nodes[&edge.to].position;
        field.interpolated_risk(a.midpoint(b))
    }
}

impl Default for WeightedRoadNetwork {
    fn default() -> Self {
        Self {
            nodes:          BTreeMap::new(),
            edges:          BTreeMap::new(),
            adjacency:      FxHashMap::default(),
            penalty_factor: DEFAULT_PENALTY_FACTOR,
            spatial_idx:    RTree::new(),
        }
    }
}

impl std::fmt::Debug for WeightedRoadNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedRoadNetwork")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("penalty_factor", &self.penalty_factor)
            .finish()
    }
}

pub(crate) fn check_penalty(penalty_factor: f64) -> NetworkResult<()> {
    if penalty_factor.is_finite() && penalty_factor >= 0.0 {
        Ok(())
    } else {
        Err(NetworkError::InvalidPenalty(penalty_factor))
    }
}

//! Structural validation and summary statistics.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use sr_core::{EdgeId, NodeId};

use crate::{NetworkError, NetworkResult, WeightedRoadNetwork};

/// A structural problem found by [`WeightedRoadNetwork::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Violation {
    /// Edge references a node that is not in the network.
    DanglingEndpoint { edge: EdgeId, node: NodeId },
    /// Edge distance is zero, negative, or not finite.
    NonPositiveDistance { edge: EdgeId, distance: f64 },
    /// Node with no incident edges.
    OrphanNode(NodeId),
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::DanglingEndpoint { edge, node } => {
                write!(f, "{edge} references missing {node}")
            }
            Violation::NonPositiveDistance { edge, distance } => {
                write!(f, "{edge} has non-positive distance {distance}")
            }
            Violation::OrphanNode(node) => write!(f, "{node} has no incident edges"),
        }
    }
}

/// Summary of the network's current state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count:          usize,
    pub edge_count:          usize,
    pub directed_edge_count: usize,
    pub total_distance:      f64,
    pub avg_distance:        f64,
    pub avg_risk:            f64,
    pub avg_cost:            f64,
    pub penalty_factor:      f64,
    /// `true` if every node is reachable from every other when edge
    /// direction is ignored.
    pub is_connected:        bool,
}

impl WeightedRoadNetwork {
    /// Report structural violations without failing.  Callers decide which
    /// ones matter; an empty list means the network is clean.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut touched: FxHashSet<NodeId> = FxHashSet::default();

        for edge in self.edges() {
            for node in [edge.from, edge.to] {
                if self.contains_node(node) {
                    touched.insert(node);
                } else {
                    violations.push(Violation::DanglingEndpoint { edge: edge.id, node });
                }
            }
            if !edge.distance.is_finite() || edge.distance <= 0.0 {
                violations.push(Violation::NonPositiveDistance {
                    edge:     edge.id,
                    distance: edge.distance,
                });
            }
        }

        violations.extend(
            self.nodes()
                .filter(|n| !touched.contains(&n.id))
                .map(|n| Violation::OrphanNode(n.id)),
        );
        violations
    }

    /// Counts, averages, and a weak-connectivity flag.
    ///
    /// Averages over zero edges are 0.  Fails with
    /// [`NetworkError::EmptyNetwork`] when there are no nodes.
    pub fn graph_stats(&self) -> NetworkResult<GraphStats> {
        if self.is_empty() {
            return Err(NetworkError::EmptyNetwork);
        }

        let edge_count = self.edge_count();
        let (mut total_distance, mut total_risk, mut total_cost) = (0.0, 0.0, 0.0);
        let mut directed_edge_count = 0;
        for e in self.edges() {
            total_distance += e.distance;
            total_risk     += e.risk();
            total_cost     += e.cost();
            directed_edge_count += e.directed as usize;
        }
        let mean = |sum: f64| if edge_count == 0 { 0.0 } else { sum / edge_count as f64 };

        Ok(GraphStats {
            node_count: self.node_count(),
            edge_count,
            directed_edge_count,
            total_distance,
            avg_distance: mean(total_distance),
            avg_risk: mean(total_risk),
            avg_cost: mean(total_cost),
            penalty_factor: self.penalty_factor(),
            is_connected: self.is_weakly_connected(),
        })
    }

    /// Single BFS from the lowest node id over the undirected view.
    fn is_weakly_connected(&self) -> bool {
        let Some(start) = self.nodes().next().map(|n| n.id) else {
            return true;
        };

        let mut undirected: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
        for e in self.edges() {
            undirected.entry(e.from).or_default().push(e.to);
            undirected.entry(e.to).or_default().push(e.from);
        }

        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(node) = queue.pop_front() {
            for &next in undirected.get(&node).into_iter().flatten() {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len() == self.node_count()
    }
}

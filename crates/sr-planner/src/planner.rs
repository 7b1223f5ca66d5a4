//! `RoutePlanner` and the Dijkstra search it is built on.
//!
//! # Determinism
//!
//! Frontier entries are ordered by `(cost, node id)`: of two entries with
//! equal cost the one with the lower node id is settled first.  Relaxation
//! uses a strict `<`, so the first predecessor to reach a node at its final
//! cost keeps it.  Neighbours are visited in adjacency insertion order.
//! Together these make every search a pure function of the network.
//!
//! # Masks
//!
//! The k-alternative search reuses the same routine with some edges and
//! nodes excluded (see [`crate::yen`]).  A plain safest-path query runs with
//! an empty mask.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use sr_core::{EdgeId, EngineConfig, NodeId, SafetyThresholds, SearchBudget};
use sr_network::WeightedRoadNetwork;

use crate::path::{Hop, Path};
use crate::{PlanError, PlanResult};

// ── RoutePlanner ──────────────────────────────────────────────────────────────

/// Stateless query front end: every method is a pure function of the network
/// it is handed and its own thresholds/budget.
#[derive(Clone, Debug, Default)]
pub struct RoutePlanner {
    pub(crate) thresholds: SafetyThresholds,
    pub(crate) budget:     SearchBudget,
}

impl RoutePlanner {
    pub fn new(thresholds: SafetyThresholds, budget: SearchBudget) -> Self {
        Self { thresholds, budget }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.thresholds.clone(), config.budget.clone())
    }

    pub fn thresholds(&self) -> &SafetyThresholds {
        &self.thresholds
    }

    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    /// Minimum-cost path from `start` to `end` over the current edge costs.
    ///
    /// `start == end` yields a trivial path.  Fails with
    /// [`PlanError::UnknownNode`] if either endpoint is absent and
    /// [`PlanError::NoPathFound`] if `end` is unreachable.
    pub fn safest_path(
        &self,
        network: &WeightedRoadNetwork,
        start: NodeId,
        end: NodeId,
    ) -> PlanResult<Path> {
        check_endpoints(network, start, end)?;
        if start == end {
            return Ok(Path::trivial(start));
        }
        match dijkstra(network, start, end, &SearchMask::default())? {
            Some(hops) => Path::from_hops(network, start, &hops),
            None => Err(PlanError::NoPathFound { from: start, to: end }),
        }
    }
}

pub(crate) fn check_endpoints(
    network: &WeightedRoadNetwork,
    start: NodeId,
    end: NodeId,
) -> PlanResult<()> {
    for node in [start, end] {
        if !network.contains_node(node) {
            return Err(PlanError::UnknownNode(node));
        }
    }
    Ok(())
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Edges and nodes a search may not use.
#[derive(Default)]
pub(crate) struct SearchMask {
    pub edges: FxHashSet<EdgeId>,
    pub nodes: FxHashSet<NodeId>,
}

/// Heap entry.  `Ord` is reversed so `BinaryHeap` (a max-heap) pops the
/// lowest cost first, then the lowest node id.
#[derive(Clone, Copy, Debug)]
struct State {
    cost: f64,
    node: NodeId,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Hops of the cheapest `from → to` route avoiding `mask`, or `None` if `to`
/// is unreachable.  `from != to` and both exist.
pub(crate) fn dijkstra(
    network: &WeightedRoadNetwork,
    from: NodeId,
    to: NodeId,
    mask: &SearchMask,
) -> PlanResult<Option<Vec<Hop>>> {
    // dist[v] = best known cost to reach v.
    let mut dist: FxHashMap<NodeId, f64> = FxHashMap::default();
    // prev[v] = hop that reached v.
    let mut prev: FxHashMap<NodeId, Hop> = FxHashMap::default();

    dist.insert(from, 0.0);
    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, node: from });

    while let Some(State { cost, node }) = heap.pop() {
        if node == to {
            return Ok(Some(reconstruct(&prev, from, to)));
        }

        // Skip stale heap entries.
        if dist.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        for &(neighbor, edge) in network.neighbors(node)? {
            if mask.edges.contains(&edge) || mask.nodes.contains(&neighbor) {
                continue;
            }
            let new_cost = cost + network.edge_cost(edge)?;
            if dist.get(&neighbor).is_none_or(|&best| new_cost < best) {
                dist.insert(neighbor, new_cost);
                prev.insert(neighbor, Hop { edge, from: node, to: neighbor });
                heap.push(State { cost: new_cost, node: neighbor });
            }
        }
    }

    Ok(None)
}

fn reconstruct(prev: &FxHashMap<NodeId, Hop>, from: NodeId, to: NodeId) -> Vec<Hop> {
    let mut hops = Vec::new();
    let mut cur = to;
    while cur != from {
        let Some(&hop) = prev.get(&cur) else { break };
        hops.push(hop);
        cur = hop.from;
    }
    hops.reverse();
    hops
}

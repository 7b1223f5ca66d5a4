//! Bounded k-alternative search (Yen's algorithm).
//!
//! # Algorithm
//!
//! ```text
//! A[0] = safest path
//! for each rank r = 1..k:
//!     for each spur node A[r-1].nodes[i]:
//!         root   = A[r-1].nodes[..=i]
//!         block  every edge from the spur node to the next hop of a found
//!                path with this root (parallel roads included)
//!         block  every root node except the spur node
//!         spur   = dijkstra(spur node → end) under the blocks
//!         candidates += root ⧺ spur        (unless already seen)
//!     A[r] = cheapest candidate (ties: lexicographically lower node sequence)
//! ```
//!
//! Blocking an undirected edge blocks both directions.  A simple path can
//! never cross the spur's blocked edge backwards without revisiting the spur
//! node, so this loses no candidates.
//!
//! # Budget
//!
//! Every spur search counts against [`SearchBudget`](sr_core::SearchBudget):
//! either its explicit cap or `k × (edges in A[0] + 1) × spur_budget_factor`.
//! Running out fails with [`PlanError::ResourceExceeded`]; the optional
//! wall-clock limit fails with [`PlanError::Timeout`].

use std::time::Instant;

use log::debug;
use rustc_hash::FxHashSet;

use sr_core::NodeId;
use sr_network::WeightedRoadNetwork;

use crate::path::Path;
use crate::planner::{check_endpoints, dijkstra, SearchMask};
use crate::{PlanError, PlanResult, RoutePlanner};

impl RoutePlanner {
    /// Up to `k` loopless paths from `start` to `end` in non-decreasing cost
    /// order, with no two sharing a node sequence.
    ///
    /// Fewer than `k` paths is not an error: the result holds every simple
    /// path that exists when there are fewer.  Fails with
    /// [`PlanError::InvalidK`] for `k == 0` and with the same errors as
    /// [`safest_path`](Self::safest_path) for bad or disconnected endpoints.
    pub fn k_safest_paths(
        &self,
        network: &WeightedRoadNetwork,
        start: NodeId,
        end: NodeId,
        k: usize,
    ) -> PlanResult<Vec<Path>> {
        if k == 0 {
            return Err(PlanError::InvalidK);
        }
        check_endpoints(network, start, end)?;

        let started = Instant::now();
        let first = self.safest_path(network, start, end)?;
        let budget = self.budget.spur_searches_for(k, first.edge_count());

        let mut seen: FxHashSet<Vec<NodeId>> = FxHashSet::default();
        seen.insert(first.nodes.clone());
        let mut found = vec![first];
        let mut candidates: Vec<Path> = Vec::new();
        let mut spur_searches = 0usize;

        while found.len() < k {
            let last = &found[found.len() - 1];

            for i in 0..last.edge_count() {
                if spur_searches >= budget {
                    return Err(PlanError::ResourceExceeded { budget, found: found.len() });
                }
                if let Some(limit) = self.budget.max_duration_ms {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    if elapsed_ms >= limit {
                        return Err(PlanError::Timeout { elapsed_ms, found: found.len() });
                    }
                }
                spur_searches += 1;

                let spur_node = last.nodes[i];
                let root = &last.nodes[..=i];

                // Paths are told apart by node sequence, so every parallel
                // road to a used next hop must go too.
                let mut mask = SearchMask::default();
                let spur_out = network.neighbors(spur_node)?;
                for p in &found {
                    if p.nodes.len() > i + 1 && p.nodes[..=i] == *root {
                        let next = p.nodes[i + 1];
                        mask.edges.extend(
                            spur_out.iter().filter(|&&(to, _)| to == next).map(|&(_, e)| e),
                        );
                    }
                }
                mask.nodes.extend(root[..i].iter().copied());

                let Some(spur_hops) = dijkstra(network, spur_node, end, &mask)? else {
                    continue;
                };
                let spur = Path::from_hops(network, spur_node, &spur_hops)?;

                let mut segments = last.segments[..i].to_vec();
                segments.extend_from_slice(&spur.segments);
                let candidate = Path::from_segments(start, segments);

                if seen.insert(candidate.nodes.clone()) {
                    candidates.push(candidate);
                }
            }

            let Some(best) = cheapest(&candidates) else {
                break;
            };
            found.push(candidates.swap_remove(best));
        }

        // Keeps costs non-decreasing under float rounding.
        found.sort_by(|a, b| a.total_cost.total_cmp(&b.total_cost));

        debug!(
            "k_safest_paths {start}→{end}: {} of {k} paths, {spur_searches}/{budget} spur searches",
            found.len()
        );
        Ok(found)
    }
}

fn cheapest(candidates: &[Path]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.total_cost
                .total_cmp(&b.total_cost)
                .then_with(|| a.nodes.cmp(&b.nodes))
        })
        .map(|(i, _)| i)
}

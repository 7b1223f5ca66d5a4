//! Shared planning handle for concurrent callers.
//!
//! # Locking
//!
//! ```text
//! network: RwLock<WeightedRoadNetwork>   queries read, refresh writes
//! risk:    RwLock<Arc<RiskField>>        swapped whole, never edited in place
//! ```
//!
//! A refresh builds the new `RiskField` without holding any lock, then takes
//! the network write lock, recomputes every cost and swaps the field handle
//! before releasing it.  A query therefore sees either the old costs with the
//! old field or the new costs with the new field.  Locks are always taken
//! network first, then risk.

use std::sync::Arc;

use log::info;
use parking_lot::RwLock;

use sr_core::{EngineConfig, NodeId, Position};
use sr_network::{GraphStats, NetworkError, NetworkSnapshot, WeightedRoadNetwork};
use sr_risk::{RiskField, RiskSnapshot};

use crate::{Path, PlanResult, RoutePlanner, SafetyReport, SpeedModel};

pub struct SafeRouteEngine {
    config:  EngineConfig,
    planner: RoutePlanner,
    speed:   SpeedModel,
    network: RwLock<WeightedRoadNetwork>,
    risk:    RwLock<Arc<RiskField>>,
}

impl SafeRouteEngine {
    /// Wrap `network`, applying the configured penalty factor.
    ///
    /// Until the first [`refresh`](Self::refresh) the risk field is empty and
    /// edge costs are whatever `network` already carries.
    pub fn new(mut network: WeightedRoadNetwork, config: EngineConfig) -> PlanResult<Self> {
        config.validate()?;
        network.update_risk_penalty_factor(config.penalty_factor)?;
        let speed = SpeedModel::new(config.default_speed_kmh)?;
        Ok(Self {
            planner: RoutePlanner::from_config(&config),
            speed,
            risk: RwLock::new(Arc::new(RiskField::new(config.idw.clone()))),
            network: RwLock::new(network),
            config,
        })
    }

    /// Replace the speed model used by [`travel_time_minutes`](Self::travel_time_minutes).
    pub fn with_speed_model(mut self, speed: SpeedModel) -> Self {
        self.speed = speed;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn planner(&self) -> &RoutePlanner {
        &self.planner
    }

    // ── Writers ───────────────────────────────────────────────────────────

    /// Load `snapshot`, recompute every edge cost and publish the new field.
    ///
    /// All-or-nothing: an invalid snapshot or a failed cost refresh leaves
    /// both the network and the current field untouched.  Returns the number
    /// of edges updated.
    pub fn refresh(&self, snapshot: &RiskSnapshot) -> PlanResult<usize> {
        let field = Arc::new(RiskField::from_snapshot(snapshot, self.config.idw.clone())?);

        let mut network = self.network.write();
        let updated = network.refresh_risk_costs(&field)?;
        *self.risk.write() = field;
        info!("engine refreshed: {updated} edges @{}", snapshot.timestamp_unix_secs);
        Ok(updated)
    }

    /// Change the penalty factor and recompute every cost from current risks.
    pub fn set_penalty_factor(&self, penalty_factor: f64) -> PlanResult<()> {
        self.network.write().update_risk_penalty_factor(penalty_factor)?;
        Ok(())
    }

    /// Replace the topology, reapplying the current field's risks.
    ///
    /// On error the previous network stays in place.
    pub fn import_network(&self, snapshot: &NetworkSnapshot) -> PlanResult<()> {
        let mut fresh = WeightedRoadNetwork::from_snapshot(snapshot)?;
        let mut network = self.network.write();
        let field = Arc::clone(&*self.risk.read());
        if !field.is_empty() {
            fresh.refresh_risk_costs(&field)?;
        }
        *network = fresh;
        Ok(())
    }

    // ── Readers ───────────────────────────────────────────────────────────

    /// Handle to the current risk field.  Stays valid after later refreshes.
    pub fn risk_field(&self) -> Arc<RiskField> {
        Arc::clone(&*self.risk.read())
    }

    /// Run `f` with shared access to the network.
    pub fn with_network<R>(&self, f: impl FnOnce(&WeightedRoadNetwork) -> R) -> R {
        f(&self.network.read())
    }

    pub fn export_network(&self) -> NetworkSnapshot {
        self.network.read().export_snapshot()
    }

    pub fn graph_stats(&self) -> PlanResult<GraphStats> {
        Ok(self.network.read().graph_stats()?)
    }

    pub fn safest_path(&self, from: NodeId, to: NodeId) -> PlanResult<Path> {
        self.planner.safest_path(&self.network.read(), from, to)
    }

    pub fn k_safest_paths(&self, from: NodeId, to: NodeId, k: usize) -> PlanResult<Vec<Path>> {
        self.planner.k_safest_paths(&self.network.read(), from, to, k)
    }

    /// Snap both positions to their nearest nodes and route between them.
    pub fn safest_path_between(&self, from: Position, to: Position) -> PlanResult<Path> {
        let network = self.network.read();
        let (Some(a), Some(b)) = (network.snap_to_node(from), network.snap_to_node(to)) else {
            return Err(NetworkError::EmptyNetwork.into());
        };
        self.planner.safest_path(&network, a, b)
    }

    pub fn analyze(&self, path: &Path) -> SafetyReport {
        self.planner.analyze_route_safety(path)
    }

    pub fn travel_time_minutes(&self, path: &Path) -> PlanResult<f64> {
        self.planner.estimate_travel_time(&self.network.read(), path, &self.speed)
    }

    /// Node-sample route risk from the current field.
    pub fn route_risk(&self, nodes: &[NodeId]) -> PlanResult<f64> {
        Ok(self.risk_field().route_risk(nodes)?)
    }
}

impl std::fmt::Debug for SafeRouteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeRouteEngine")
            .field("config", &self.config)
            .field("network", &*self.network.read())
            .field("risk", &*self.risk.read())
            .finish()
    }
}

//! Engine configuration.
//!
//! All structs here are plain data with `Default` impls.  Applications
//! typically load an [`EngineConfig`] from a JSON file (with the `serde`
//! feature, missing fields fall back to their defaults) and hand it to the
//! engine, which calls [`EngineConfig::validate`] once up front.

use crate::{CoreError, CoreResult, RiskLevel};

// ── IdwConfig ─────────────────────────────────────────────────────────────────

/// Inverse-distance-weighting parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IdwConfig {
    /// Number of nearest node samples blended per query.  Default: 4.
    pub k: usize,
    /// Distance exponent `p` in `weight = 1 / d^p`.  Default: 2.
    pub power: f64,
}

impl Default for IdwConfig {
    fn default() -> Self {
        Self { k: 4, power: 2.0 }
    }
}

// ── SafetyThresholds ──────────────────────────────────────────────────────────

/// Lower bounds of the `Moderate`, `High`, and `Critical` bands.
///
/// A value below `moderate` is `Safe`.  Bounds are inclusive: a risk exactly
/// equal to `high` classifies as `High`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SafetyThresholds {
    pub moderate: f64,
    pub high:     f64,
    pub critical: f64,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self { moderate: 0.25, high: 0.5, critical: 0.75 }
    }
}

impl SafetyThresholds {
    /// Band for `risk`.
    pub fn classify(&self, risk: f64) -> RiskLevel {
        if risk >= self.critical {
            RiskLevel::Critical
        } else if risk >= self.high {
            RiskLevel::High
        } else if risk >= self.moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::Safe
        }
    }
}

// ── SearchBudget ──────────────────────────────────────────────────────────────

/// Work limits for k-alternative search.
///
/// The spur-search cap is either explicit (`max_spur_searches`) or derived
/// per query as `k × (edges in the first path + 1) × spur_budget_factor`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchBudget {
    pub max_spur_searches:  Option<usize>,
    pub spur_budget_factor: usize,
    /// Wall-clock limit in milliseconds.  `None` disables the check.
    pub max_duration_ms:    Option<u64>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_spur_searches:  None,
            spur_budget_factor: 8,
            max_duration_ms:    None,
        }
    }
}

impl SearchBudget {
    /// Spur-search cap for a query asking for `k` paths whose first path has
    /// `first_path_edges` edges.
    pub fn spur_searches_for(&self, k: usize, first_path_edges: usize) -> usize {
        self.max_spur_searches.unwrap_or_else(|| {
            k.saturating_mul(first_path_edges + 1)
                .saturating_mul(self.spur_budget_factor)
        })
    }
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Top-level configuration for the planning engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Multiplier applied to risk in `cost = distance × (1 + penalty × risk)`.
    /// Default: 50 (a fully dangerous edge costs 51× its length).
    pub penalty_factor: f64,

    /// Fallback travel speed for edges without speed metadata, km/h.
    /// Default: 5 (walking pace).
    pub default_speed_kmh: f64,

    pub idw:        IdwConfig,
    pub thresholds: SafetyThresholds,
    pub budget:     SearchBudget,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            penalty_factor:    50.0,
            default_speed_kmh: 5.0,
            idw:               IdwConfig::default(),
            thresholds:        SafetyThresholds::default(),
            budget:            SearchBudget::default(),
        }
    }
}

impl EngineConfig {
    /// Check every parameter once; returns the first problem found.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.penalty_factor.is_finite() || self.penalty_factor < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "penalty_factor must be a finite value >= 0, got {}",
                self.penalty_factor
            )));
        }
        if !self.default_speed_kmh.is_finite() || self.default_speed_kmh <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "default_speed_kmh must be > 0, got {}",
                self.default_speed_kmh
            )));
        }
        if self.idw.k == 0 {
            return Err(CoreError::InvalidConfig("idw.k must be at least 1".into()));
        }
        if !self.idw.power.is_finite() || self.idw.power <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "idw.power must be > 0, got {}",
                self.idw.power
            )));
        }
        let t = &self.thresholds;
        let ascending = 0.0 <= t.moderate && t.moderate <= t.high && t.high <= t.critical && t.critical <= 1.0;
        if !ascending {
            return Err(CoreError::InvalidConfig(format!(
                "thresholds must satisfy 0 <= moderate <= high <= critical <= 1, got {} / {} / {}",
                t.moderate, t.high, t.critical
            )));
        }
        if self.budget.spur_budget_factor == 0 && self.budget.max_spur_searches.is_none() {
            return Err(CoreError::InvalidConfig(
                "budget.spur_budget_factor must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

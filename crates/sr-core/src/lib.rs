//! `sr-core` — foundational types for the SafeRoute planning engine.
//!
//! This crate is a dependency of every other `sr-*` crate.  It intentionally
//! has no `sr-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`                                         |
//! | [`geo`]    | `Position` (planar metres), `GeoPoint`, haversine distance |
//! | [`level`]  | `RiskLevel` classification bands                           |
//! | [`config`] | `EngineConfig`, `IdwConfig`, `SafetyThresholds`, `SearchBudget` |
//! | [`error`]  | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod level;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EngineConfig, IdwConfig, SafetyThresholds, SearchBudget};
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, Position};
pub use ids::{EdgeId, NodeId};
pub use level::RiskLevel;

/// `true` if `value` is a finite number inside the closed unit interval.
///
/// Every risk value entering the engine passes through this check; `NaN` and
/// infinities are rejected along with out-of-range values.
#[inline]
pub fn is_valid_risk(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

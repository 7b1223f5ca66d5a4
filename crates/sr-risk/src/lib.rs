//! `sr-risk` — risk snapshots and the interpolated risk field.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`snapshot`] | `RiskSnapshot`, `NodeRiskSample`, `EdgeRiskSample`, `PointRiskSample` |
//! | [`field`]    | `RiskField` (IDW over an R-tree), `RiskSample`, `SampleOwner` |
//! | [`heatmap`]  | `Incident`, `ThreatLevel`, severity weighting, zone aggregation, incident → snapshot |
//! | [`loader`]   | `load_incidents_csv`, `load_incidents_reader`                |
//! | [`error`]    | `RiskError`, `RiskResult<T>`                                 |
//!
//! # Lifecycle
//!
//! A backend hands the engine a complete [`RiskSnapshot`] on every update.
//! [`RiskField::load`] validates it as a whole and swaps it in, so a field
//! never holds a mix of two snapshots.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod error;
pub mod field;
pub mod heatmap;
pub mod loader;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use error::{RiskError, RiskResult};
pub use field::{RiskField, RiskSample, SampleOwner};
pub use heatmap::{
    aggregate_zones, severity_weight, snapshot_from_incidents, Incident, RiskZone, ThreatLevel,
};
pub use loader::{load_incidents_csv, load_incidents_reader};
pub use snapshot::{EdgeRiskSample, NodeRiskSample, PointRiskSample, RiskSnapshot};

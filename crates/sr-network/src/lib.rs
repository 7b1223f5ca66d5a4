//! `sr-network` — risk-weighted road network.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`model`]    | `Node`, `Edge`, `risk_cost`                                  |
//! | [`network`]  | `WeightedRoadNetwork` (adjacency index + R-tree), cost refresh |
//! | [`stats`]    | `GraphStats`, `Violation`, structural validation             |
//! | [`snapshot`] | `NetworkSnapshot` JSON round trip                            |
//! | [`error`]    | `NetworkError`, `NetworkResult<T>`                           |
//!
//! # Cost model
//!
//! ```text
//! cost = distance × (1 + penalty_factor × risk)
//! ```
//!
//! Risk 0 never discounts an edge; risk 1 at the default penalty of 50 makes
//! it 51× as expensive.  Cost is monotonic in risk, so raising an edge's risk
//! can only make it less attractive.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Resolves edge risks on Rayon's pool during refresh.        |

pub mod error;
pub mod model;
pub mod network;
pub mod snapshot;
pub mod stats;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use model::{risk_cost, Edge, Node};
pub use network::WeightedRoadNetwork;
pub use snapshot::NetworkSnapshot;
pub use stats::{GraphStats, Violation};

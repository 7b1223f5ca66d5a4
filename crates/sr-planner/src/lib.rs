//! `sr-planner` — route search and diagnostics over a `WeightedRoadNetwork`.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`planner`] | `RoutePlanner`, `safest_path` (Dijkstra)                  |
//! | [`yen`]     | `k_safest_paths` (bounded Yen's algorithm)                |
//! | [`path`]    | `Path`, `PathSegment`                                     |
//! | [`safety`]  | `analyze_route_safety`, `SafetyReport`                    |
//! | [`travel`]  | `estimate_travel_time`, `SpeedModel`                      |
//! | [`engine`]  | `SafeRouteEngine`: shared network + swappable risk field  |
//! | [`error`]   | `PlanError`, `PlanResult<T>`                              |
//!
//! # Typical flow
//!
//! ```text
//! let engine = SafeRouteEngine::new(network, config)?;
//! engine.refresh(&risk_snapshot)?;                 // writer
//! let path   = engine.safest_path(home, shelter)?; // readers, any thread
//! let report = engine.analyze(&path);
//! ```
//!
//! `RoutePlanner` itself holds no mutable state and can be used directly on
//! a caller-owned network.

pub mod engine;
pub mod error;
pub mod path;
pub mod planner;
pub mod safety;
pub mod travel;
pub mod yen;


pub use engine::SafeRouteEngine;
pub use error::{PlanError, PlanResult};
pub use path::{Path, PathSegment};
pub use planner::RoutePlanner;
pub use safety::{SafetyReport, SafetyStatus, SegmentAssessment};
pub use travel::{SpeedModel, WALKING_SPEED_KMH};

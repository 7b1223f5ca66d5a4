//! Planner error type.

use thiserror::Error;

use sr_core::{CoreError, NodeId};
use sr_network::NetworkError;
use sr_risk::RiskError;

/// Errors produced by `sr-planner`.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("node {0} not found in network")]
    UnknownNode(NodeId),

    #[error("no path from {from} to {to}")]
    NoPathFound { from: NodeId, to: NodeId },

    #[error("k must be at least 1")]
    InvalidK,

    #[error("k-path search exceeded its budget of {budget} spur searches ({found} paths found)")]
    ResourceExceeded { budget: usize, found: usize },

    #[error("k-path search timed out after {elapsed_ms} ms ({found} paths found)")]
    Timeout { elapsed_ms: u64, found: usize },

    #[error("invalid speed {0} km/h (must be finite and > 0)")]
    InvalidSpeed(f64),

    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("risk error: {0}")]
    Risk(#[from] RiskError),
}

pub type PlanResult<T> = Result<T, PlanError>;

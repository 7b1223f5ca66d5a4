//! Network-subsystem error type.

use thiserror::Error;

use sr_core::{EdgeId, NodeId};
use sr_risk::RiskError;

/// Errors produced by `sr-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("node {0} not found in network")]
    UnknownNode(NodeId),

    #[error("edge {0} not found in network")]
    UnknownEdge(EdgeId),

    #[error("edge {edge} references missing endpoint {node}")]
    UnknownEndpoint { edge: EdgeId, node: NodeId },

    #[error("node {0} already exists")]
    DuplicateNode(NodeId),

    #[error("edge {0} already exists")]
    DuplicateEdge(EdgeId),

    #[error("edge {edge} has invalid distance {distance} (must be finite and > 0)")]
    InvalidDistance { edge: EdgeId, distance: f64 },

    #[error("edge {edge} has invalid speed {speed_kmh} km/h (must be finite and > 0)")]
    InvalidSpeed { edge: EdgeId, speed_kmh: f64 },

    #[error("edge {edge} has risk {risk} outside [0, 1]")]
    InvalidRisk { edge: EdgeId, risk: f64 },

    #[error("node {0} has a non-finite position")]
    InvalidPosition(NodeId),

    #[error("penalty factor {0} must be finite and >= 0")]
    InvalidPenalty(f64),

    #[error("network has no nodes")]
    EmptyNetwork,

    #[error("risk resolution failed: {0}")]
    Risk(#[from] RiskError),

    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;

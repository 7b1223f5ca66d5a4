//! Risk-subsystem error type.

use thiserror::Error;

use sr_core::NodeId;

/// Errors produced by `sr-risk`.
#[derive(Debug, Error)]
pub enum RiskError {
    #[error("risk {value} for {owner} is outside [0, 1]")]
    InvalidRisk { owner: String, value: f64 },

    #[error("non-finite position for {owner}")]
    InvalidPosition { owner: String },

    #[error("node {0} has no risk sample")]
    UnknownNode(NodeId),

    #[error("risk field has no samples to interpolate from")]
    EmptyField,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RiskResult<T> = Result<T, RiskError>;

//! Core error type.
//!
//! Sub-crates define their own error enums; `CoreError` only covers problems
//! detectable from `sr-core` types alone (configuration sanity).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    InvalidConfig(String),
}

/// Shorthand result type for `sr-core`.
pub type CoreResult<T> = Result<T, CoreError>;

//! Graph-subsystem error type.

use thiserror::Error;

/// Errors produced by `watt-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("truncated graph file: {0}")]
    Truncated(String),

    #[error("malformed graph: {0}")]
    Malformed(String),

    #[error("unknown turn cost model: {0}")]
    UnknownTurnCostModel(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

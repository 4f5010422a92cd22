//! Engine error type.
//!
//! Invalid input surfaces as a client error (HTTP 400); graph loading
//! failures are fatal at construction time; everything else inside a query
//! is recovered locally by the search layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Parameter not found: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter has invalid value: {name} = {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("node id {0} out of range")]
    NodeOutOfRange(u32),

    #[error("No route found.")]
    NoRoute,

    #[error(transparent)]
    Graph(#[from] watt_graph::GraphError),

    /// A broken invariant (e.g. a poisoned handler context); fatal for the
    /// query, reported as a server error.
    #[error("internal error: {0}")]
    Internal(String),
}

//! Function-algebra error type.

use thiserror::Error;

/// Errors produced by `watt-func`.
#[derive(Debug, Error, PartialEq)]
pub enum FuncError {
    /// The function has no inverse at the requested value (constant piece,
    /// or value outside the image).
    #[error("function is not invertible at y = {0}")]
    NotInvertible(f64),
}

pub type FuncResult<T> = Result<T, FuncError>;

//! Define Errors

use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, QuadprogError>;

/// Master Error type of this crate
#[derive(Debug, Error)]
pub enum QuadprogError {
    /// Hessian is not square
    #[error("Not square: rows({}) != cols({})", rows, cols)]
    NotSquare { rows: usize, cols: usize },

    /// Cholesky factorization hit a nonpositive pivot
    #[error("Matrix is not positive definite: nonpositive pivot in column {}", column)]
    NotPositiveDefinite { column: usize },

    /// An equality constraint lies in the span of the previous ones
    #[error("Equality constraint {} is linearly dependent on the previous ones", constraint)]
    EqualityConstraintsDependent { constraint: usize },

    /// Array size is inconsistent with the problem dimensions
    #[error("Dimension mismatch for {}: expected {}, found {}", object, expected, found)]
    ShapeMismatch {
        object: &'static str,
        expected: usize,
        found: usize,
    },
}

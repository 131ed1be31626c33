//! Basic scalar types and their methods
//!
//! The solver is generic over the real scalars, i.e. the types
//! satisfying `Scalar<Real = Self> + Float` (`f32` and `f64`).

pub use cauchy::Scalar;

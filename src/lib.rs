//! Dense convex quadratic programming for [`ndarray`](https://github.com/rust-ndarray/ndarray),
//! implementing the dual active-set method of Goldfarb and Idnani.
//!
//! The crate solves problems of the form
//!
//! ```text
//! minimize    (1/2) xᵀ G x + g₀ᵀ x
//! subject to  CEᵀ x + ce₀  = 0
//!             CIᵀ x + ci₀ ≥ 0
//! ```
//!
//! with `G` symmetric positive-definite, dense and of small to medium
//! size. The method factors `G` once, starts from the unconstrained
//! minimizer, and walks the dual-feasible iterate onto the violated
//! constraints one at a time; the factorization of the working set is
//! maintained by Givens rotations rather than rebuilt.
//!
//! Solving
//! -------
//! - [`solve_quadprog`](quadprog::solve_quadprog) borrows the problem
//!   and returns a [`QpSolution`](quadprog::QpSolution) with the
//!   optimizer and the Lagrange multipliers of both constraint blocks;
//! - [`solve_quadprog_inplace`](quadprog::solve_quadprog_inplace)
//!   avoids every copy: `G` is overwritten by its Cholesky factor and
//!   `x` receives the optimizer.
//!
//! An infeasible problem is reported with objective `+∞`, not as an
//! error; a `G` that is not positive-definite and equality constraints
//! that are linearly dependent are reported through
//! [`QuadprogError`](error::QuadprogError).
//!
//! ```
//! use ndarray::*;
//! use ndarray_quadprog::*;
//!
//! // minimize (1/2)‖x‖² subject to A x ≤ b, posed as CI = −Aᵀ, ci₀ = b
//! let a = array![
//!     [-1.0, 0.0],
//!     [0.0, -1.0],
//!     [-1.0, -2.0],
//!     [-1.0, 1.0],
//!     [1.0, 0.0],
//! ];
//! let b = array![0.0, 0.0, -2.0, 1.0, 3.0];
//!
//! let g: Array2<f64> = Array2::eye(2);
//! let g0: Array1<f64> = Array1::zeros(2);
//! let ci = a.t().mapv(|v| -v);
//!
//! let sol = solve_quadprog(&g, &g0, &Array2::zeros((2, 0)), &Array1::zeros(0), &ci, &b).unwrap();
//! assert_close_l2!(&sol.x, &array![0.4, 0.8], 1e-9);
//! assert_aclose!(sol.objective, 0.4, 1e-9);
//! ```
//!
//! Utilities
//! ---------
//! - [Assertions for array](assert/index.html)
//! - [Random matrix generators](generate/index.html)

#![allow(clippy::many_single_char_names, clippy::needless_range_loop)]
#![deny(rustdoc::broken_intra_doc_links, rustdoc::private_intra_doc_links)]

pub mod assert;
pub mod cholesky;
pub mod error;
pub mod generate;
pub mod quadprog;
pub mod types;

mod working_set;

pub use crate::assert::*;
pub use crate::cholesky::*;
pub use crate::error::*;
pub use crate::generate::*;
pub use crate::quadprog::*;
pub use crate::types::*;

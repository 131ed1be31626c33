//! Cholesky factorization of symmetric positive-definite matrices and
//! the triangular solves built on it

use ndarray::*;
use num_traits::Float;

use crate::error::*;
use crate::types::*;

/// Factor a symmetric positive-definite matrix in place as `A = L Lᵀ`.
///
/// On return the lower triangle of `a` holds `L` and the upper triangle
/// mirrors it, so `a[(i, j)] == a[(j, i)]` everywhere; the mirrored
/// entries are what [`backward_elimination`] reads as `Lᵀ`.
pub fn cholesky_decomposition<A, S>(a: &mut ArrayBase<S, Ix2>) -> Result<()>
where
    A: Scalar<Real = A> + Float,
    S: DataMut<Elem = A>,
{
    let n = a.nrows();
    for i in 0..n {
        for j in i..n {
            let mut sum = a[(i, j)];
            for k in 0..i {
                sum = sum - a[(i, k)] * a[(j, k)];
            }
            if i == j {
                if sum <= A::zero() {
                    return Err(QuadprogError::NotPositiveDefinite { column: i });
                }
                a[(i, i)] = Float::sqrt(sum);
            } else {
                a[(j, i)] = sum / a[(i, i)];
            }
        }
        for k in i + 1..n {
            a[(i, k)] = a[(k, i)];
        }
    }
    Ok(())
}

/// Solve `L y = b` with `l` lower triangular, sweeping top-down.
pub fn forward_elimination<A, Sl, Sy, Sb>(
    l: &ArrayBase<Sl, Ix2>,
    y: &mut ArrayBase<Sy, Ix1>,
    b: &ArrayBase<Sb, Ix1>,
) where
    A: Scalar<Real = A> + Float,
    Sl: Data<Elem = A>,
    Sy: DataMut<Elem = A>,
    Sb: Data<Elem = A>,
{
    let n = l.nrows();
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum = sum - l[(i, j)] * y[j];
        }
        y[i] = sum / l[(i, i)];
    }
}

/// Solve `U x = y` with `u` upper triangular, sweeping bottom-up.
pub fn backward_elimination<A, Su, Sx, Sy>(
    u: &ArrayBase<Su, Ix2>,
    x: &mut ArrayBase<Sx, Ix1>,
    y: &ArrayBase<Sy, Ix1>,
) where
    A: Scalar<Real = A> + Float,
    Su: Data<Elem = A>,
    Sx: DataMut<Elem = A>,
    Sy: Data<Elem = A>,
{
    let n = u.nrows();
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in i + 1..n {
            sum = sum - u[(i, j)] * x[j];
        }
        x[i] = sum / u[(i, i)];
    }
}

/// Solve `A x = b` given the mirrored factor produced by
/// [`cholesky_decomposition`].
pub fn cholesky_solve<A, Sl, Sx, Sb>(
    l: &ArrayBase<Sl, Ix2>,
    x: &mut ArrayBase<Sx, Ix1>,
    b: &ArrayBase<Sb, Ix1>,
) where
    A: Scalar<Real = A> + Float,
    Sl: Data<Elem = A>,
    Sx: DataMut<Elem = A>,
    Sb: Data<Elem = A>,
{
    let mut y = Array1::zeros(l.nrows());
    forward_elimination(l, &mut y, b);
    backward_elimination(l, x, &y);
}

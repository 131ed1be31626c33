//! Generator functions for matrices

use ndarray::*;
use rand::prelude::*;

use crate::types::*;

/// Generate random array with given shape
///
/// - This function uses [rand::thread_rng].
///   See [random_using] for using another RNG
pub fn random<A, S, Sh, D>(sh: Sh) -> ArrayBase<S, D>
where
    A: Scalar,
    S: DataOwned<Elem = A>,
    D: Dimension,
    Sh: ShapeBuilder<Dim = D>,
{
    let mut rng = thread_rng();
    random_using(sh, &mut rng)
}

/// Generate random array with given RNG
///
/// - See [random] for using default RNG
pub fn random_using<A, S, Sh, D, R>(sh: Sh, rng: &mut R) -> ArrayBase<S, D>
where
    A: Scalar,
    S: DataOwned<Elem = A>,
    D: Dimension,
    Sh: ShapeBuilder<Dim = D>,
    R: Rng,
{
    ArrayBase::from_shape_fn(sh, |_| A::rand(rng))
}

/// Random symmetric positive-definite matrix
///
/// - Eigenvalue of matrix must be larger than 1 (thus non-singular)
/// - This function uses [rand::thread_rng].
///   See [random_spd_using] for using another RNG.
///
pub fn random_spd<A, S>(n: usize) -> ArrayBase<S, Ix2>
where
    A: Scalar<Real = A>,
    S: DataOwned<Elem = A> + DataMut,
{
    let mut rng = rand::thread_rng();
    random_spd_using(n, &mut rng)
}

/// Random symmetric positive-definite matrix with given RNG
///
/// - Eigenvalue of matrix must be larger than 1 (thus non-singular)
/// - See [random_spd] for using default RNG.
///
pub fn random_spd_using<A, S, R>(n: usize, rng: &mut R) -> ArrayBase<S, Ix2>
where
    A: Scalar<Real = A>,
    S: DataOwned<Elem = A> + DataMut,
    R: Rng,
{
    let a: Array2<A> = random_using((n, n), rng);
    ArrayBase::eye(n) + &a.t().dot(&a)
}

//! Assertions for array

use ndarray::*;
use num_traits::Float;

use crate::types::*;

fn norm_l2<A, S, D>(a: &ArrayBase<S, D>) -> A
where
    A: Scalar<Real = A> + Float,
    S: Data<Elem = A>,
    D: Dimension,
{
    Float::sqrt(a.iter().fold(A::zero(), |acc, &v| acc + v * v))
}

fn norm_max<A, S, D>(a: &ArrayBase<S, D>) -> A
where
    A: Scalar<Real = A> + Float,
    S: Data<Elem = A>,
    D: Dimension,
{
    a.iter().fold(A::zero(), |acc, &v| acc.max(Float::abs(v)))
}

/// check two values are close in terms of the absolute tolerance
pub fn aclose<A>(test: A, truth: A, atol: A) -> Result<A, A>
where
    A: Scalar<Real = A> + Float,
{
    let dev = Float::abs(test - truth);
    if dev < atol {
        Ok(dev)
    } else {
        Err(dev)
    }
}

/// check two arrays are close in maximum norm
pub fn close_max<A, S1, S2, D>(
    test: &ArrayBase<S1, D>,
    truth: &ArrayBase<S2, D>,
    atol: A,
) -> Result<A, A>
where
    A: Scalar<Real = A> + Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    let tol = norm_max(&(test - truth));
    if tol < atol {
        Ok(tol)
    } else {
        Err(tol)
    }
}

/// check two arrays are close in L2 norm
pub fn close_l2<A, S1, S2, D>(
    test: &ArrayBase<S1, D>,
    truth: &ArrayBase<S2, D>,
    rtol: A,
) -> Result<A, A>
where
    A: Scalar<Real = A> + Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    let tol = norm_l2(&(test - truth)) / norm_l2(truth);
    if tol < rtol {
        Ok(tol)
    } else {
        Err(tol)
    }
}

macro_rules! generate_assert {
    ($assert:ident, $close:path) => {
#[macro_export]
macro_rules! $assert {
    ($test:expr, $truth:expr, $tol:expr) => {
        $close($test, $truth, $tol).unwrap();
    };
    ($test:expr, $truth:expr, $tol:expr; $comment:expr) => {
        $close($test, $truth, $tol).expect($comment);
    };
}
}} // generate_assert!

generate_assert!(assert_aclose, aclose);
generate_assert!(assert_close_max, close_max);
generate_assert!(assert_close_l2, close_l2);

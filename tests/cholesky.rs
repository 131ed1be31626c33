use ndarray::*;
use ndarray_quadprog::*;

macro_rules! cholesky {
    ($elem:ty, $rtol:expr) => {
        paste::item! {
            #[test]
            fn [<cholesky_ $elem>]() {
                let a_orig: Array2<$elem> = random_spd(3);
                println!("a = \n{:?}", a_orig);
                let mut a = a_orig.clone();
                cholesky_decomposition(&mut a).unwrap();
                let mut l: Array2<$elem> = Array2::zeros((3, 3));
                for i in 0..3 {
                    for j in 0..=i {
                        l[(i, j)] = a[(i, j)];
                    }
                }
                assert_close_l2!(&l.dot(&l.t()), &a_orig, $rtol);
                // the upper triangle mirrors the factor
                for i in 0..3 {
                    for j in i + 1..3 {
                        assert_eq!(a[(i, j)], a[(j, i)]);
                    }
                }
            }
        }
    };
}
cholesky!(f64, 1e-9);
cholesky!(f32, 1e-4);

macro_rules! cholesky_solve_random {
    ($elem:ty, $rtol:expr) => {
        paste::item! {
            #[test]
            fn [<cholesky_solve_ $elem>]() {
                let a: Array2<$elem> = random_spd(4);
                let x: Array1<$elem> = random(4);
                let b = a.dot(&x);
                let mut l = a.clone();
                cholesky_decomposition(&mut l).unwrap();
                let mut y: Array1<$elem> = Array1::zeros(4);
                cholesky_solve(&l, &mut y, &b);
                assert_close_l2!(&y, &x, $rtol);
            }
        }
    };
}
cholesky_solve_random!(f64, 1e-9);
cholesky_solve_random!(f32, 1e-3);

#[test]
fn eliminations_solve_triangular_systems() {
    // factor stored mirrored: lower triangle is L, upper is Lᵀ
    let l = array![[2.0, 1.0], [1.0, 3.0]];
    let b = array![4.0, 11.0];
    let mut y = Array1::zeros(2);
    forward_elimination(&l, &mut y, &b);
    assert_close_l2!(&y, &array![2.0, 3.0], 1e-12);
    let mut x = Array1::zeros(2);
    backward_elimination(&l, &mut x, &y);
    assert_close_l2!(&x, &array![0.5, 1.0], 1e-12);
}

#[test]
fn non_positive_definite_is_detected() {
    // eigenvalues 3 and −1
    let mut a = array![[1.0, 2.0], [2.0, 1.0]];
    let err = cholesky_decomposition(&mut a).unwrap_err();
    assert!(matches!(err, QuadprogError::NotPositiveDefinite { column: 1 }));
}

//! Maintenance of the active-set factorization
//!
//! The working set keeps a QR-style factorization of the active
//! constraint normals seen through the transformed basis `J = L⁻ᵀ Q`:
//! `R` is upper-triangular over the active columns, and the trailing
//! columns of `J` span the null space of the active normals. Both are
//! updated by Givens rotations when a constraint enters or leaves, so
//! no factorization is ever rebuilt from scratch.

use ndarray::*;
use num_traits::Float;

use crate::types::*;

/// Identity of a constraint in the working set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Constraint {
    /// Column index into the equality matrix
    Equality(usize),
    /// Column index into the inequality matrix
    Inequality(usize),
}

/// Factorization of the active constraint normals, together with the
/// active-set bookkeeping it moves in lockstep with.
///
/// `active.len()` is the current working-set size; `u[..active.len()]`
/// are the multipliers of the active constraints and the slot just past
/// them carries the multiplier of the candidate under consideration.
pub(crate) struct WorkingSet<A> {
    pub(crate) r: Array2<A>,
    pub(crate) j: Array2<A>,
    pub(crate) active: Vec<Constraint>,
    pub(crate) u: Array1<A>,
    r_norm: A,
}

impl<A> WorkingSet<A>
where
    A: Scalar<Real = A> + Float,
{
    /// Start from the transformed basis `j = L⁻ᵀ` with nothing active.
    pub(crate) fn new(j: Array2<A>, n_constraints: usize) -> Self {
        let n = j.nrows();
        WorkingSet {
            r: Array2::zeros((n, n)),
            j,
            active: Vec::with_capacity(n_constraints),
            u: Array1::zeros(n_constraints),
            r_norm: A::one(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.active.len()
    }

    /// `d = Jᵀ np`: the constraint normal in the transformed basis.
    pub(crate) fn project(&self, np: ArrayView1<'_, A>, d: &mut Array1<A>) {
        for (i, col) in self.j.axis_iter(Axis(1)).enumerate() {
            d[i] = col.dot(&np);
        }
    }

    /// `z = Σ_{k ≥ iq} J[:, k] d[k]`: the component of the normal in
    /// the null space of the active set, i.e. the primal step direction.
    pub(crate) fn primal_direction(&self, d: &Array1<A>, z: &mut Array1<A>) {
        z.fill(A::zero());
        for k in self.len()..self.j.ncols() {
            z.scaled_add(d[k], &self.j.column(k));
        }
    }

    /// `r = R⁻¹ d` over the active triangle: the negative of the step
    /// direction in dual space.
    pub(crate) fn dual_direction(&self, d: &Array1<A>, r: &mut Array1<A>) {
        let iq = self.len();
        for i in (0..iq).rev() {
            let mut sum = d[i];
            for j in i + 1..iq {
                sum = sum - self.r[(i, j)] * r[j];
            }
            r[i] = sum / self.r[(i, i)];
        }
    }

    /// Rotate the tail of the projected normal `d` to zero and commit
    /// its head as the next column of the triangle.
    ///
    /// Returns `false`, leaving the set unchanged, when the projection
    /// of the normal onto the null space is numerically zero: the
    /// constraint is linearly dependent on the working set.
    pub(crate) fn add(&mut self, c: Constraint, d: &mut Array1<A>) -> bool {
        let n = self.j.nrows();
        let iq = self.len();
        if iq == n {
            // n active normals already span the whole space
            return false;
        }
        // Zero d[k] against d[k - 1] from the bottom up; each rotation
        // is mirrored onto the matching column pair of J. When the
        // cosine comes out negative the rotation is negated and the new
        // pivot is −h.
        for k in (iq + 1..n).rev() {
            let cc = d[k - 1];
            let ss = d[k];
            let h = cc.hypot(ss);
            if h < A::epsilon() {
                continue;
            }
            d[k] = A::zero();
            let mut ss = ss / h;
            let mut cc = cc / h;
            if cc < A::zero() {
                cc = -cc;
                ss = -ss;
                d[k - 1] = -h;
            } else {
                d[k - 1] = h;
            }
            let xny = ss / (A::one() + cc);
            for row in 0..n {
                let t1 = self.j[(row, k - 1)];
                let t2 = self.j[(row, k)];
                self.j[(row, k - 1)] = t1 * cc + t2 * ss;
                self.j[(row, k)] = xny * (t1 + self.j[(row, k - 1)]) - t2;
            }
        }
        if Float::abs(d[iq]) <= A::epsilon() * self.r_norm {
            return false;
        }
        for i in 0..=iq {
            self.r[(i, iq)] = d[i];
        }
        self.active.push(c);
        self.r_norm = self.r_norm.max(Float::abs(d[iq]));
        true
    }

    /// Drop inequality `l` from the working set, shifting the later
    /// columns left and rotating away the subdiagonal this leaves in
    /// the triangle.
    pub(crate) fn remove(&mut self, l: usize) {
        let n = self.j.nrows();
        let iq = self.len();
        let qq = self
            .active
            .iter()
            .position(|&c| c == Constraint::Inequality(l))
            .expect("dropped constraint is active");
        self.active.remove(qq);
        for i in qq..iq - 1 {
            self.u[i] = self.u[i + 1];
            for row in 0..n {
                self.r[(row, i)] = self.r[(row, i + 1)];
            }
        }
        // the candidate multiplier in the slot past the set moves down
        // with everything else
        self.u[iq - 1] = self.u[iq];
        self.u[iq] = A::zero();
        for row in 0..iq {
            self.r[(row, iq - 1)] = A::zero();
        }
        let iq = iq - 1;
        for j in qq..iq {
            let cc = self.r[(j, j)];
            let ss = self.r[(j + 1, j)];
            let h = cc.hypot(ss);
            if h < A::epsilon() {
                continue;
            }
            let mut cc = cc / h;
            let mut ss = ss / h;
            self.r[(j + 1, j)] = A::zero();
            if cc < A::zero() {
                self.r[(j, j)] = -h;
                cc = -cc;
                ss = -ss;
            } else {
                self.r[(j, j)] = h;
            }
            let xny = ss / (A::one() + cc);
            for k in j + 1..iq {
                let t1 = self.r[(j, k)];
                let t2 = self.r[(j + 1, k)];
                self.r[(j, k)] = t1 * cc + t2 * ss;
                self.r[(j + 1, k)] = xny * (t1 + self.r[(j, k)]) - t2;
            }
            for k in 0..n {
                let t1 = self.j[(k, j)];
                let t2 = self.j[(k, j + 1)];
                self.j[(k, j)] = t1 * cc + t2 * ss;
                self.j[(k, j + 1)] = xny * (self.j[(k, j)] + t1) - t2;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::close_max;

    fn unit_basis(n: usize, cap: usize) -> WorkingSet<f64> {
        WorkingSet::new(Array2::eye(n), cap)
    }

    fn add_normal(ws: &mut WorkingSet<f64>, c: Constraint, np: &Array1<f64>) -> bool {
        let mut d = Array1::zeros(np.len());
        ws.project(np.view(), &mut d);
        ws.add(c, &mut d)
    }

    fn assert_upper_triangular(ws: &WorkingSet<f64>) {
        let iq = ws.len();
        for j in 0..iq {
            for i in j + 1..ws.r.nrows() {
                assert!(
                    ws.r[(i, j)].abs() < 1e-12,
                    "R[({}, {})] = {}",
                    i,
                    j,
                    ws.r[(i, j)]
                );
            }
            assert!(ws.r[(j, j)].abs() > 1e-12);
        }
    }

    fn assert_orthogonal(ws: &WorkingSet<f64>) {
        let n = ws.j.nrows();
        let jtj = ws.j.t().dot(&ws.j);
        close_max(&jtj, &Array2::eye(n), 1e-12).unwrap();
    }

    #[test]
    fn add_keeps_triangle_and_basis() {
        let mut ws = unit_basis(3, 3);
        assert!(add_normal(&mut ws, Constraint::Inequality(0), &array![1.0, 1.0, 0.0]));
        assert!(add_normal(&mut ws, Constraint::Inequality(1), &array![0.0, 1.0, 1.0]));
        assert_eq!(ws.len(), 2);
        assert_upper_triangular(&ws);
        assert_orthogonal(&ws);
    }

    #[test]
    fn dependent_normal_is_rejected() {
        let mut ws = unit_basis(3, 3);
        assert!(add_normal(&mut ws, Constraint::Inequality(0), &array![1.0, 0.0, 0.0]));
        assert!(add_normal(&mut ws, Constraint::Inequality(1), &array![0.0, 1.0, 0.0]));
        assert!(!add_normal(&mut ws, Constraint::Inequality(2), &array![1.0, 1.0, 0.0]));
        assert_eq!(ws.len(), 2);
        assert_upper_triangular(&ws);
    }

    #[test]
    fn full_set_rejects_further_normals() {
        let mut ws = unit_basis(2, 4);
        assert!(add_normal(&mut ws, Constraint::Inequality(0), &array![1.0, 0.0]));
        assert!(add_normal(&mut ws, Constraint::Inequality(1), &array![0.0, 1.0]));
        assert!(!add_normal(&mut ws, Constraint::Inequality(2), &array![1.0, 1.0]));
    }

    #[test]
    fn remove_restores_triangle() {
        let mut ws = unit_basis(3, 4);
        assert!(add_normal(&mut ws, Constraint::Inequality(0), &array![1.0, 1.0, 0.0]));
        assert!(add_normal(&mut ws, Constraint::Inequality(1), &array![0.0, 1.0, 1.0]));
        assert!(add_normal(&mut ws, Constraint::Inequality(2), &array![1.0, 0.0, 2.0]));
        ws.remove(1);
        assert_eq!(
            ws.active,
            vec![Constraint::Inequality(0), Constraint::Inequality(2)]
        );
        assert_upper_triangular(&ws);
        assert_orthogonal(&ws);
        // the normal dropped from the middle can come back in
        assert!(add_normal(&mut ws, Constraint::Inequality(1), &array![0.0, 1.0, 1.0]));
        assert_upper_triangular(&ws);
    }
}

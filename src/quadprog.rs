//! Strictly convex quadratic programming by the dual active-set method
//! of Goldfarb and Idnani
//!
//! The solver starts from the unconstrained minimizer, which is
//! dual-feasible, and repeatedly makes the most violated inequality
//! tight while keeping every multiplier nonnegative. The working-set
//! factorization is maintained incrementally by Givens rotations, so
//! each iteration costs `O(n²)`.
//!
//! Reference: D. Goldfarb, A. Idnani, "A numerically stable dual method
//! for solving strictly convex quadratic programs", Mathematical
//! Programming 27 (1983), 1–33.

use ndarray::*;
use num_traits::Float;

use crate::cholesky::*;
use crate::error::*;
use crate::types::*;
use crate::working_set::{Constraint, WorkingSet};

/// Solution of a quadratic program.
#[derive(Debug, Clone)]
pub struct QpSolution<A> {
    /// Optimal objective value, `+∞` when the problem is infeasible
    pub objective: A,
    /// Optimizer, or the last iterate when the problem is infeasible
    pub x: Array1<A>,
    /// Lagrange multipliers of the equality constraints
    pub eq_multipliers: Array1<A>,
    /// Lagrange multipliers of the inequality constraints; zero for
    /// constraints inactive at the solution
    pub ineq_multipliers: Array1<A>,
}

impl<A> QpSolution<A>
where
    A: Scalar<Real = A> + Float,
{
    /// The problem has no feasible point.
    pub fn is_infeasible(&self) -> bool {
        self.objective.is_infinite()
    }
}

#[cfg_attr(doc, katexit::katexit)]
/// Solve the strictly convex quadratic program
///
/// $$ \min_x \frac{1}{2} x^T G x + g_0^T x
///    \quad \text{s.t.} \quad C_E^T x + c_{e0} = 0,
///    \quad C_I^T x + c_{i0} \geq 0 $$
///
/// where `g` is the symmetric positive-definite $n \times n$ matrix
/// $G$, `ce` is $n \times p$ and `ci` is $n \times m$ (either may have
/// zero columns). A problem posed as $A x \leq b$ is passed by setting
/// $C_I = -A^T$ and $c_{i0} = b$.
///
/// `g` is copied; use [`solve_quadprog_inplace`] to factor it in place
/// instead. An infeasible problem is not an error: it is reported with
/// objective $+\infty$ and `x` left at the last iterate.
///
/// ```
/// use ndarray::*;
/// use ndarray_quadprog::*;
///
/// // minimize (1/2)‖x‖² subject to x₁ + x₂ = 1
/// let g: Array2<f64> = Array2::eye(2);
/// let g0: Array1<f64> = Array1::zeros(2);
/// let ce = array![[1.0], [1.0]];
/// let ce0 = array![-1.0];
/// let ci: Array2<f64> = Array2::zeros((2, 0));
/// let ci0: Array1<f64> = Array1::zeros(0);
///
/// let sol = solve_quadprog(&g, &g0, &ce, &ce0, &ci, &ci0).unwrap();
/// assert_close_l2!(&sol.x, &array![0.5, 0.5], 1e-9);
/// assert_aclose!(sol.objective, 0.25, 1e-9);
/// ```
pub fn solve_quadprog<A, Sg, Sg0, Se, Se0, Si, Si0>(
    g: &ArrayBase<Sg, Ix2>,
    g0: &ArrayBase<Sg0, Ix1>,
    ce: &ArrayBase<Se, Ix2>,
    ce0: &ArrayBase<Se0, Ix1>,
    ci: &ArrayBase<Si, Ix2>,
    ci0: &ArrayBase<Si0, Ix1>,
) -> Result<QpSolution<A>>
where
    A: Scalar<Real = A> + Float,
    Sg: Data<Elem = A>,
    Sg0: Data<Elem = A>,
    Se: Data<Elem = A>,
    Se0: Data<Elem = A>,
    Si: Data<Elem = A>,
    Si0: Data<Elem = A>,
{
    let mut g = g.to_owned();
    let mut x = Array1::zeros(g.nrows());
    let (objective, ws) = solve_impl(
        g.view_mut(),
        g0.view(),
        ce.view(),
        ce0.view(),
        ci.view(),
        ci0.view(),
        x.view_mut(),
    )?;
    let mut eq_multipliers = Array1::zeros(ce.ncols());
    let mut ineq_multipliers = Array1::zeros(ci.ncols());
    for (k, &c) in ws.active.iter().enumerate() {
        match c {
            Constraint::Equality(i) => eq_multipliers[i] = ws.u[k],
            Constraint::Inequality(i) => ineq_multipliers[i] = ws.u[k],
        }
    }
    Ok(QpSolution {
        objective,
        x,
        eq_multipliers,
        ineq_multipliers,
    })
}

/// Solve the quadratic program of [`solve_quadprog`] without copying.
///
/// `g` is overwritten by its Cholesky factor (lower triangle, mirrored
/// into the upper); the contents of `x` on entry are ignored and
/// replaced by the optimizer. Returns the optimal objective, or `+∞`
/// when the problem is infeasible.
pub fn solve_quadprog_inplace<A, Sg, Sg0, Se, Se0, Si, Si0, Sx>(
    g: &mut ArrayBase<Sg, Ix2>,
    g0: &ArrayBase<Sg0, Ix1>,
    ce: &ArrayBase<Se, Ix2>,
    ce0: &ArrayBase<Se0, Ix1>,
    ci: &ArrayBase<Si, Ix2>,
    ci0: &ArrayBase<Si0, Ix1>,
    x: &mut ArrayBase<Sx, Ix1>,
) -> Result<A>
where
    A: Scalar<Real = A> + Float,
    Sg: DataMut<Elem = A>,
    Sg0: Data<Elem = A>,
    Se: Data<Elem = A>,
    Se0: Data<Elem = A>,
    Si: Data<Elem = A>,
    Si0: Data<Elem = A>,
    Sx: DataMut<Elem = A>,
{
    let (objective, _) = solve_impl(
        g.view_mut(),
        g0.view(),
        ce.view(),
        ce0.view(),
        ci.view(),
        ci0.view(),
        x.view_mut(),
    )?;
    Ok(objective)
}

fn solve_impl<'a, A>(
    mut g: ArrayViewMut2<'_, A>,
    g0: ArrayView1<'_, A>,
    ce: ArrayView2<'_, A>,
    ce0: ArrayView1<'_, A>,
    ci: ArrayView2<'a, A>,
    ci0: ArrayView1<'a, A>,
    mut x: ArrayViewMut1<'a, A>,
) -> Result<(A, WorkingSet<A>)>
where
    A: Scalar<Real = A> + Float,
{
    let (n, p, m) = validate_shapes(&g, &g0, &ce, &ce0, &ci, &ci0, &x)?;

    // trace of G before it is overwritten by its factor
    let c1 = g.diag().sum();
    cholesky_decomposition(&mut g)?;
    let (j, c2) = inverse_factor_basis(&g);

    // the unconstrained minimizer x = −G⁻¹ g₀ is dual-feasible
    cholesky_solve(&g, &mut x, &g0);
    x.mapv_inplace(|v| -v);
    let f_value = A::real(0.5) * g0.dot(&x);

    // c1·c2 estimates cond(G) and sets the scale below which remaining
    // violations count as zero
    let threshold =
        A::real(100.0) * A::real(m) * A::epsilon() * Float::abs(c1 * c2);

    let mut iterate = DualIterate {
        ci,
        ci0,
        x,
        ws: WorkingSet::new(j, p + m),
        n_eq: p,
        f_value,
        threshold,
        s: Array1::zeros(m),
        np: Array1::zeros(n),
        z: Array1::zeros(n),
        d: Array1::zeros(n),
        r: Array1::zeros(p + m),
        u_old: Array1::zeros(p + m),
        x_old: Array1::zeros(n),
        active_old: Vec::with_capacity(p + m),
        inactive: vec![true; m],
        excluded: vec![false; m],
        ip: 0,
    };
    iterate.add_equality_constraints(ce, ce0)?;
    Ok(iterate.run())
}

/// Columns of `J = L⁻ᵀ` by forward substitution of the unit vectors,
/// together with `c2 = tr(L⁻¹)`.
fn inverse_factor_basis<A>(l: &ArrayViewMut2<'_, A>) -> (Array2<A>, A)
where
    A: Scalar<Real = A> + Float,
{
    let n = l.nrows();
    let mut j = Array2::zeros((n, n));
    let mut rhs = Array1::zeros(n);
    let mut z = Array1::zeros(n);
    let mut c2 = A::zero();
    for i in 0..n {
        rhs[i] = A::one();
        forward_elimination(l, &mut z, &rhs);
        j.row_mut(i).assign(&z);
        c2 = c2 + z[i];
        rhs[i] = A::zero();
    }
    (j, c2)
}

fn validate_shapes<A>(
    g: &ArrayViewMut2<'_, A>,
    g0: &ArrayView1<'_, A>,
    ce: &ArrayView2<'_, A>,
    ce0: &ArrayView1<'_, A>,
    ci: &ArrayView2<'_, A>,
    ci0: &ArrayView1<'_, A>,
    x: &ArrayViewMut1<'_, A>,
) -> Result<(usize, usize, usize)> {
    let (rows, cols) = g.dim();
    if rows != cols {
        return Err(QuadprogError::NotSquare { rows, cols });
    }
    let n = rows;
    let p = ce.ncols();
    let m = ci.ncols();
    let lengths = [
        ("g0", n, g0.len()),
        ("x", n, x.len()),
        ("CE", n, ce.nrows()),
        ("ce0", p, ce0.len()),
        ("CI", n, ci.nrows()),
        ("ci0", m, ci0.len()),
    ];
    for &(object, expected, found) in &lengths {
        if expected != found {
            return Err(QuadprogError::ShapeMismatch {
                object,
                expected,
                found,
            });
        }
    }
    Ok((n, p, m))
}

/// Control state of the outer iteration.
enum Phase<A> {
    /// Recompute every violation, test for convergence, snapshot
    Refresh,
    /// Pick the most violated constraint still open for selection
    Select,
    /// Compute step lengths for the candidate and advance
    Step,
    /// Finished with the given objective
    Done(A),
}

/// One dual-feasible iterate and the scratch state moved along with it.
struct DualIterate<'a, A> {
    ci: ArrayView2<'a, A>,
    ci0: ArrayView1<'a, A>,
    x: ArrayViewMut1<'a, A>,
    ws: WorkingSet<A>,
    n_eq: usize,
    f_value: A,
    threshold: A,
    /// inequality residuals `CIᵀ x + ci₀`
    s: Array1<A>,
    /// normal of the candidate constraint
    np: Array1<A>,
    /// primal step direction
    z: Array1<A>,
    /// candidate normal in the transformed basis
    d: Array1<A>,
    /// negative dual step direction
    r: Array1<A>,
    u_old: Array1<A>,
    x_old: Array1<A>,
    active_old: Vec<Constraint>,
    /// true for inequalities not in the working set
    inactive: Vec<bool>,
    /// true for inequalities shut out of selection until the next refresh
    excluded: Vec<bool>,
    /// candidate constraint index
    ip: usize,
}

impl<'a, A> DualIterate<'a, A>
where
    A: Scalar<Real = A> + Float,
{
    /// Force every equality constraint into the working set, stepping
    /// the iterate onto each hyperplane in turn.
    fn add_equality_constraints(
        &mut self,
        ce: ArrayView2<'_, A>,
        ce0: ArrayView1<'_, A>,
    ) -> Result<()> {
        for i in 0..ce.ncols() {
            self.np.assign(&ce.column(i));
            self.ws.project(self.np.view(), &mut self.d);
            self.ws.primal_direction(&self.d, &mut self.z);
            self.ws.dual_direction(&self.d, &mut self.r);

            // step onto the hyperplane; zero when the normal has no
            // component left outside the span of the working set
            let t2 = if Float::abs(self.z.dot(&self.z)) > A::epsilon() {
                (-self.np.dot(&self.x) - ce0[i]) / self.z.dot(&self.np)
            } else {
                A::zero()
            };

            let iq = self.ws.len();
            self.ws.u[iq] = A::zero();
            self.apply_step(t2);
            if !self.ws.add(Constraint::Equality(i), &mut self.d) {
                return Err(QuadprogError::EqualityConstraintsDependent { constraint: i });
            }
        }
        Ok(())
    }

    fn run(mut self) -> (A, WorkingSet<A>) {
        let mut phase = Phase::Refresh;
        loop {
            phase = match phase {
                Phase::Refresh => self.refresh(),
                Phase::Select => self.select(),
                Phase::Step => self.step(),
                Phase::Done(objective) => return (objective, self.ws),
            };
        }
    }

    /// Recompute every inequality residual, stop once the total
    /// violation is below the working precision, and snapshot the state
    /// a degenerate step will need to restore.
    fn refresh(&mut self) -> Phase<A> {
        self.inactive.fill(true);
        for k in self.n_eq..self.ws.len() {
            if let Constraint::Inequality(i) = self.ws.active[k] {
                self.inactive[i] = false;
            }
        }
        self.excluded.fill(false);

        let mut psi = A::zero();
        for (i, col) in self.ci.axis_iter(Axis(1)).enumerate() {
            let si = col.dot(&self.x) + self.ci0[i];
            self.s[i] = si;
            psi = psi + si.min(A::zero());
        }
        if Float::abs(psi) <= self.threshold {
            return Phase::Done(self.f_value);
        }

        self.u_old.assign(&self.ws.u);
        self.active_old.clone_from(&self.ws.active);
        self.x_old.assign(&self.x);
        Phase::Select
    }

    /// Choose the most violated constraint among those neither active
    /// nor excluded; none violated means the iterate is optimal.
    fn select(&mut self) -> Phase<A> {
        let mut ss = A::zero();
        let mut ip = None;
        for (i, &si) in self.s.iter().enumerate() {
            if si < ss && self.inactive[i] && !self.excluded[i] {
                ss = si;
                ip = Some(i);
            }
        }
        let ip = match ip {
            Some(ip) => ip,
            None => return Phase::Done(self.f_value),
        };
        self.ip = ip;
        self.np.assign(&self.ci.column(ip));
        let iq = self.ws.len();
        self.ws.u[iq] = A::zero();
        Phase::Step
    }

    /// Compute the dual and primal step lengths for the candidate,
    /// advance the iterate, and resolve which constraint enters or
    /// leaves the working set.
    fn step(&mut self) -> Phase<A> {
        let iq = self.ws.len();
        self.ws.project(self.np.view(), &mut self.d);
        self.ws.primal_direction(&self.d, &mut self.z);
        self.ws.dual_direction(&self.d, &mut self.r);

        // largest step in dual space keeping every inequality
        // multiplier nonnegative, with the constraint attaining it
        let mut dual: Option<(A, usize)> = None;
        for k in self.n_eq..iq {
            if let Constraint::Inequality(l) = self.ws.active[k] {
                if self.r[k] > A::zero() {
                    let ratio = self.ws.u[k] / self.r[k];
                    if dual.map_or(true, |(t1, _)| ratio < t1) {
                        dual = Some((ratio, l));
                    }
                }
            }
        }

        // step in primal space making the candidate tight; none when
        // its normal has no component in the null space
        let full = if Float::abs(self.z.dot(&self.z)) > A::epsilon() {
            Some(-self.s[self.ip] / self.z.dot(&self.np))
        } else {
            None
        };

        match (dual, full) {
            // no finite step in either space: the problem is infeasible
            (None, None) => Phase::Done(A::infinity()),
            // step in dual space only: the blocking constraint leaves
            // and the directions are recomputed
            (Some((t1, l)), None) => {
                for k in 0..iq {
                    self.ws.u[k] = self.ws.u[k] - t1 * self.r[k];
                }
                self.ws.u[iq] = self.ws.u[iq] + t1;
                self.inactive[l] = true;
                self.ws.remove(l);
                Phase::Step
            }
            (None, Some(t2)) => {
                self.apply_step(t2);
                self.finish_full_step()
            }
            (Some((t1, l)), Some(t2)) => {
                let t = t1.min(t2);
                self.apply_step(t);
                if Float::abs(t - t2) < A::epsilon() {
                    self.finish_full_step()
                } else {
                    // partial step: the blocking constraint leaves while
                    // the candidate stays under consideration
                    self.inactive[l] = true;
                    self.ws.remove(l);
                    self.s[self.ip] =
                        self.ci.column(self.ip).dot(&self.x) + self.ci0[self.ip];
                    Phase::Step
                }
            }
        }
    }

    /// Move the iterate by `t` along `z`, updating the multipliers and
    /// the objective.
    fn apply_step(&mut self, t: A) {
        let iq = self.ws.len();
        self.x.scaled_add(t, &self.z);
        self.f_value =
            self.f_value + t * self.z.dot(&self.np) * (A::real(0.5) * t + self.ws.u[iq]);
        for k in 0..iq {
            self.ws.u[k] = self.ws.u[k] - t * self.r[k];
        }
        self.ws.u[iq] = self.ws.u[iq] + t;
    }

    /// The candidate became tight: commit it, or unwind when its normal
    /// turns out dependent on the working set at this degenerate point.
    fn finish_full_step(&mut self) -> Phase<A> {
        if self.ws.add(Constraint::Inequality(self.ip), &mut self.d) {
            self.inactive[self.ip] = false;
            return Phase::Refresh;
        }
        // exclude the candidate until the next refresh and fall back to
        // the snapshot taken there
        self.excluded[self.ip] = true;
        self.inactive.fill(true);
        for k in self.n_eq..self.ws.len() {
            self.ws.active[k] = self.active_old[k];
            self.ws.u[k] = self.u_old[k];
            if let Constraint::Inequality(i) = self.ws.active[k] {
                self.inactive[i] = false;
            }
        }
        self.x.assign(&self.x_old);
        Phase::Select
    }
}

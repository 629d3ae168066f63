use nalgebra::{DMatrix, DVector};

use crate::numerical::gmres::{solve_gmres, GramSchmidt};

/// The right-hand-side contract: given (t, y), produce dy/dt. The system is
/// allowed to clamp y in place (the flux assembler bleeds over-saturated
/// columns back to the surface), so the state is passed mutably.
pub trait OdeSystem {
    fn rhs(&mut self, t: f64, y: &mut [f64], ydot: &mut [f64]);
}

/// Linear solver behind the Newton iteration: a dense finite-difference
/// Jacobian with LU, or a Jacobian-free restarted GMRES.
#[derive(Clone, Copy)]
pub enum LinearMode {
    Dense,
    Gmres {
        gs: GramSchmidt,
        max_krylov: usize,
        tolerance: f64,
    },
}

#[derive(Debug)]
pub enum SolverError {
    ConvergenceFailure { t: f64, h: f64 },
    ErrorTestFailure { t: f64, h: f64 },
    StepTooSmall { t: f64 },
    TooManySteps { t: f64 },
}

impl From<SolverError> for String {
    fn from(error: SolverError) -> Self {
        match error {
            SolverError::ConvergenceFailure { t, h } => {
                format!("Newton iteration failed to converge at t = {} (step {})", t, h)
            }
            SolverError::ErrorTestFailure { t, h } => {
                format!("Repeated error-test failures at t = {} (step {})", t, h)
            }
            SolverError::StepTooSmall { t } => {
                format!("Step size underflow at t = {}", t)
            }
            SolverError::TooManySteps { t } => {
                format!("Too much work: internal step budget exhausted at t = {}", t)
            }
        }
    }
}

#[derive(Default)]
#[derive(Clone, Copy)]
pub struct SolverStats {
    pub steps: u64,          //accepted internal steps
    pub rhs_evals: u64,      //right-hand-side evaluations, Jacobian included
    pub newton_iters: u64,
    pub last_order: usize,
    pub last_step: f64,
}

const MAX_NEWTON: usize = 4;
const NEWTON_TOL: f64 = 0.1;        //fraction of the step error allowance
const MAX_CONV_FAILS: usize = 10;
const MAX_ERR_FAILS: usize = 10;
const MAX_STEPS: usize = 500_000;
const SQRT_EPS: f64 = 1.4901161193847656e-8;

/*
Adaptive-step implicit integrator using backward differentiation formulas
of order one and two with a modified Newton iteration, scalar relative and
absolute tolerances, a maximum step bound and an initial step hint. The
interception/ET operator split rewrites the state between substeps, so the
driver calls reinit() each time and the history is rebuilt from the handed
state; nothing leaks from one substep to the next.
 */
pub struct BdfSolver {
    pub reltol: f64,
    pub abstol: f64,
    pub init_step: f64,
    pub max_step: f64,
    pub linear: LinearMode,
    pub stats: SolverStats,

    t: f64,
    h: f64,                  //next step size to try
    h_last: f64,             //size of the last accepted step
    y_n: Vec<f64>,
    y_nm1: Vec<f64>,
    primed: bool,            //one step accepted since reinit: BDF2 available
}

impl BdfSolver {
    pub fn new(reltol: f64, abstol: f64, init_step: f64, max_step: f64, linear: LinearMode) -> BdfSolver {
        BdfSolver {
            reltol,
            abstol,
            init_step,
            max_step,
            linear,
            stats: SolverStats::default(),
            t: 0.0,
            h: 0.0,
            h_last: 0.0,
            y_n: Vec::new(),
            y_nm1: Vec::new(),
            primed: false,
        }
    }

    /// Discards the BDF history and restarts from (t0, y0). Must be called
    /// whenever the state vector was modified outside the solver.
    pub fn reinit(&mut self, t0: f64, y0: &[f64]) {
        self.t = t0;
        self.y_n = y0.to_vec();
        self.y_nm1 = y0.to_vec();
        self.h = 0.0;
        self.h_last = 0.0;
        self.primed = false;
    }

    /// Advances the system to `tout` and writes the solution into `y`.
    pub fn integrate<S: OdeSystem>(
        &mut self,
        sys: &mut S,
        tout: f64,
        y: &mut [f64],
    ) -> Result<(), SolverError> {
        let n = self.y_n.len();
        let t_eps = 1e-10 * (tout.abs().max(1.0));
        if tout <= self.t + t_eps {
            y.copy_from_slice(&self.y_n);
            return Ok(());
        }

        let mut h = if self.h > 0.0 {
            self.h
        } else if self.init_step > 0.0 {
            self.init_step
        } else {
            (tout - self.t) / 100.0
        };

        let mut err_fails = 0usize;
        let mut conv_fails = 0usize;
        let mut steps_taken = 0usize;

        let mut f = vec![0.0f64; n];

        while self.t < tout - t_eps {
            steps_taken += 1;
            if steps_taken > MAX_STEPS {
                return Err(SolverError::TooManySteps { t: self.t });
            }

            if self.max_step > 0.0 {
                h = h.min(self.max_step);
            }
            h = h.min(tout - self.t);
            if h < 1e-12 * (self.t.abs() + 1.0) {
                return Err(SolverError::StepTooSmall { t: self.t });
            }

            let t_new = self.t + h;
            let order = if self.primed { 2 } else { 1 };

            /* variable-step BDF coefficients and predictor */
            let (c_n, c_nm1, gamma) = if order == 2 {
                let r = h / self.h_last;
                let denom = 1.0 + 2.0 * r;
                (
                    (1.0 + r) * (1.0 + r) / denom,
                    -(r * r) / denom,
                    h * (1.0 + r) / denom,
                )
            } else {
                (1.0, 0.0, h)
            };

            let mut y_pred = vec![0.0f64; n];
            if order == 2 {
                let r = h / self.h_last;
                for i in 0..n {
                    y_pred[i] = self.y_n[i] + (self.y_n[i] - self.y_nm1[i]) * r;
                }
            } else {
                /* first-order Taylor predictor, so the corrector difference
                   measures curvature rather than the slope itself */
                let mut y0 = self.y_n.clone();
                sys.rhs(self.t, &mut y0, &mut f);
                self.stats.rhs_evals += 1;
                for i in 0..n {
                    y_pred[i] = self.y_n[i] + h * f[i];
                }
            }

            /* error weights frozen at the step start */
            let mut wt = vec![0.0f64; n];
            for i in 0..n {
                wt[i] = 1.0 / (self.reltol * self.y_n[i].abs() + self.abstol);
            }

            match self.newton_solve(sys, t_new, gamma, c_n, c_nm1, &y_pred, &wt, &mut f) {
                Some(x) => {
                    /* local error from the predictor-corrector difference */
                    let est_coeff = if order == 2 { 1.0 / 3.0 } else { 0.5 };
                    let mut acc = 0.0;
                    for i in 0..n {
                        let e = (x[i] - y_pred[i]) * wt[i];
                        acc += e * e;
                    }
                    let err = est_coeff * (acc / n as f64).sqrt();

                    if err > 1.0 {
                        err_fails += 1;
                        if err_fails >= MAX_ERR_FAILS {
                            return Err(SolverError::ErrorTestFailure { t: self.t, h });
                        }
                        let factor = (0.9 * err.powf(-1.0 / (order as f64 + 1.0))).max(0.1).min(0.5);
                        h *= factor;
                        continue;
                    }

                    /* accept */
                    std::mem::swap(&mut self.y_nm1, &mut self.y_n);
                    self.y_n = x;
                    self.h_last = h;
                    self.t = t_new;
                    self.primed = true;
                    self.stats.steps += 1;
                    self.stats.last_order = order;
                    self.stats.last_step = h;
                    err_fails = 0;
                    conv_fails = 0;

                    let factor = if err > 0.0 {
                        (0.9 * err.powf(-1.0 / (order as f64 + 1.0))).max(0.5).min(2.0)
                    } else {
                        2.0
                    };
                    h *= factor;
                }
                None => {
                    conv_fails += 1;
                    if conv_fails >= MAX_CONV_FAILS {
                        return Err(SolverError::ConvergenceFailure { t: self.t, h });
                    }
                    h *= 0.25;
                }
            }
        }

        self.h = h;
        y.copy_from_slice(&self.y_n);
        Ok(())
    }

    /*
    Modified Newton on G(x) = x - c_n*y_n - c_nm1*y_nm1 - gamma*f(t, x).
    The iteration matrix I - gamma*J is built once per attempt (dense mode)
    or applied matrix-free through difference quotients (GMRES mode).
    Returns the corrected state, or None if the iteration stalls.
     */
    fn newton_solve<S: OdeSystem>(
        &mut self,
        sys: &mut S,
        t_new: f64,
        gamma: f64,
        c_n: f64,
        c_nm1: f64,
        y_pred: &[f64],
        wt: &[f64],
        f: &mut Vec<f64>,
    ) -> Option<Vec<f64>> {
        let n = y_pred.len();
        let mut x = y_pred.to_vec();
        let mut lu = None;
        let linear = self.linear;

        for _k in 0..MAX_NEWTON {
            sys.rhs(t_new, &mut x, f);
            self.stats.rhs_evals += 1;

            let residual = DVector::from_iterator(
                n,
                (0..n).map(|i| -(x[i] - c_n * self.y_n[i] - c_nm1 * self.y_nm1[i] - gamma * f[i])),
            );

            let dx = match linear {
                LinearMode::Dense => {
                    if lu.is_none() {
                        lu = Some(self.dense_iteration_matrix(sys, t_new, gamma, &x, f).lu());
                    }
                    match lu.as_ref().unwrap().solve(&residual) {
                        Some(sol) => sol,
                        None => return None,
                    }
                }
                LinearMode::Gmres { gs, max_krylov, tolerance } => {
                    let x_norm = x.iter().fold(0.0f64, |a, &b| a + b * b).sqrt();
                    let f_base = f.clone();
                    let x_base = x.clone();
                    let mut evals = 0u64;
                    let result = {
                        let mut fp = vec![0.0f64; n];
                        let mut xp = vec![0.0f64; n];
                        let matvec = |v: &DVector<f64>| -> DVector<f64> {
                            let v_norm = v.norm();
                            if v_norm == 0.0 {
                                return v.clone();
                            }
                            let sigma = SQRT_EPS * (1.0 + x_norm) / v_norm;
                            for i in 0..n {
                                xp[i] = x_base[i] + sigma * v[i];
                            }
                            sys.rhs(t_new, &mut xp, &mut fp);
                            evals += 1;
                            DVector::from_iterator(
                                n,
                                (0..n).map(|i| v[i] - gamma * (fp[i] - f_base[i]) / sigma),
                            )
                        };
                        solve_gmres(
                            matvec,
                            &residual,
                            &DVector::zeros(n),
                            gs,
                            max_krylov,
                            tolerance,
                            4,
                        )
                    };
                    self.stats.rhs_evals += evals;
                    if !result.converged {
                        return None;
                    }
                    result.solution
                }
            };

            for i in 0..n {
                x[i] += dx[i];
            }
            self.stats.newton_iters += 1;

            let mut acc = 0.0;
            for i in 0..n {
                let e = dx[i] * wt[i];
                acc += e * e;
            }
            let dx_norm = (acc / n as f64).sqrt();
            if dx_norm < NEWTON_TOL {
                return Some(x);
            }
        }
        None
    }

    /*
    Finite-difference iteration matrix I - gamma*df/dy, column by column.
     */
    fn dense_iteration_matrix<S: OdeSystem>(
        &mut self,
        sys: &mut S,
        t_new: f64,
        gamma: f64,
        x: &[f64],
        f_base: &[f64],
    ) -> DMatrix<f64> {
        let n = x.len();
        let mut m = DMatrix::identity(n, n);
        let mut xp = vec![0.0f64; n];
        let mut fp = vec![0.0f64; n];

        for j in 0..n {
            let sigma = SQRT_EPS * x[j].abs().max(1e-8);
            xp.copy_from_slice(x);
            xp[j] += sigma;
            sys.rhs(t_new, &mut xp, &mut fp);
            self.stats.rhs_evals += 1;
            for i in 0..n {
                m[(i, j)] -= gamma * (fp[i] - f_base[i]) / sigma;
            }
        }
        m
    }
}

use crate::numerical::bdf::{BdfSolver, LinearMode, OdeSystem};
use crate::numerical::gmres::GramSchmidt;

struct Decay {
    k: f64,
}

impl OdeSystem for Decay {
    fn rhs(&mut self, _t: f64, y: &mut [f64], ydot: &mut [f64]) {
        for i in 0..y.len() {
            ydot[i] = -self.k * y[i];
        }
    }
}

struct Constant {
    c: f64,
}

impl OdeSystem for Constant {
    fn rhs(&mut self, _t: f64, _y: &mut [f64], ydot: &mut [f64]) {
        for v in ydot.iter_mut() {
            *v = self.c;
        }
    }
}

struct Coupled;

impl OdeSystem for Coupled {
    fn rhs(&mut self, _t: f64, y: &mut [f64], ydot: &mut [f64]) {
        ydot[0] = -2.0 * y[0] + y[1];
        ydot[1] = y[0] - 2.0 * y[1];
    }
}

struct Broken;

impl OdeSystem for Broken {
    fn rhs(&mut self, _t: f64, _y: &mut [f64], ydot: &mut [f64]) {
        for v in ydot.iter_mut() {
            *v = f64::NAN;
        }
    }
}

fn dense_solver() -> BdfSolver {
    BdfSolver::new(1e-8, 1e-10, 1e-4, 0.0, LinearMode::Dense)
}

/// A constant-rate system integrates exactly, whatever the step sequence.
#[test]
fn test_linear_growth_is_exact() {
    let mut solver = dense_solver();
    let mut sys = Constant { c: 0.25 };
    let mut y = vec![1.0, 2.0];
    solver.reinit(0.0, &y);
    solver.integrate(&mut sys, 8.0, &mut y).unwrap();
    assert!((y[0] - 3.0).abs() < 1e-9);
    assert!((y[1] - 4.0).abs() < 1e-9);
}

#[test]
fn test_exponential_decay_dense() {
    let mut solver = dense_solver();
    let mut sys = Decay { k: 2.0 };
    let mut y = vec![1.0];
    solver.reinit(0.0, &y);
    solver.integrate(&mut sys, 1.0, &mut y).unwrap();
    assert!((y[0] - (-2.0f64).exp()).abs() < 1e-4);
    assert!(solver.stats.steps > 0);
    assert!(solver.stats.rhs_evals > solver.stats.steps);
}

/// A strongly stiff decay must not force the integrator onto explicit-size
/// steps: it lands near zero in a modest number of internal steps.
#[test]
fn test_stiff_decay() {
    let mut solver = BdfSolver::new(1e-6, 1e-10, 1e-4, 0.0, LinearMode::Dense);
    let mut sys = Decay { k: 1000.0 };
    let mut y = vec![1.0];
    solver.reinit(0.0, &y);
    solver.integrate(&mut sys, 0.1, &mut y).unwrap();
    assert!(y[0].abs() < 1e-5);
    assert!(solver.stats.steps < 10_000);
}

#[test]
fn test_coupled_system_dense() {
    let mut solver = dense_solver();
    let mut sys = Coupled;
    let mut y = vec![1.0, 0.0];
    solver.reinit(0.0, &y);
    solver.integrate(&mut sys, 1.0, &mut y).unwrap();

    let e1 = (-1.0f64).exp();
    let e3 = (-3.0f64).exp();
    assert!((y[0] - (e1 + e3) / 2.0).abs() < 1e-4);
    assert!((y[1] - (e1 - e3) / 2.0).abs() < 1e-4);
}

#[test]
fn test_exponential_decay_gmres() {
    let linear = LinearMode::Gmres {
        gs: GramSchmidt::Modified,
        max_krylov: 5,
        tolerance: 1e-8,
    };
    let mut solver = BdfSolver::new(1e-8, 1e-10, 1e-4, 0.0, linear);
    let mut sys = Decay { k: 2.0 };
    let mut y = vec![1.0];
    solver.reinit(0.0, &y);
    solver.integrate(&mut sys, 1.0, &mut y).unwrap();
    assert!((y[0] - (-2.0f64).exp()).abs() < 1e-4);
}

/// reinit must pick up state modified outside the solver (the operator
/// split rewrites the vector between substeps).
#[test]
fn test_reinit_takes_modified_state() {
    let mut solver = dense_solver();
    let mut sys = Decay { k: 2.0 };
    let mut y = vec![1.0];
    solver.reinit(0.0, &y);
    solver.integrate(&mut sys, 0.5, &mut y).unwrap();

    //an external adjustment the solver has not seen
    y[0] = 2.0;
    solver.reinit(0.5, &y);
    solver.integrate(&mut sys, 1.0, &mut y).unwrap();
    assert!((y[0] - 2.0 * (-1.0f64).exp()).abs() < 1e-4);
}

/// A right-hand side that never produces finite values is a fatal solver
/// failure, not a hang.
#[test]
fn test_broken_system_fails() {
    let mut solver = dense_solver();
    let mut sys = Broken;
    let mut y = vec![1.0];
    solver.reinit(0.0, &y);
    let result = solver.integrate(&mut sys, 1.0, &mut y);
    assert!(result.is_err());
}

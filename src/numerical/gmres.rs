use nalgebra::DVector;

/// Orthogonalisation variant for the Arnoldi process.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq)]
pub enum GramSchmidt {
    Classical,
    Modified,
}

/// Result from the GMRES solver including convergence info
pub struct GmresResult {
    pub solution: DVector<f64>,
    pub converged: bool,
    pub iterations: usize,
}

/*
Restarted GMRES for A x = b where the operator is only available as a
matrix-vector product. No preconditioning; the Hessenberg least-squares
problem is kept triangular with Givens rotations as the basis grows.
 */
pub fn solve_gmres<F>(
    mut matvec: F,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    gs: GramSchmidt,
    restart: usize,
    tolerance: f64,
    max_restarts: usize,
) -> GmresResult
where
    F: FnMut(&DVector<f64>) -> DVector<f64>,
{
    let n = b.len();
    let m = restart.max(1).min(n.max(1));
    let mut x = x0.clone();
    let mut total_iterations = 0;

    let mut b_norm = b.norm();
    if b_norm == 0.0 {
        b_norm = 1.0;
    }

    for _cycle in 0..max_restarts.max(1) {
        let r = b - matvec(&x);
        let beta = r.norm();
        if beta / b_norm < tolerance {
            return GmresResult {
                solution: x,
                converged: true,
                iterations: total_iterations,
            };
        }

        let mut v: Vec<DVector<f64>> = Vec::with_capacity(m + 1);
        v.push(&r / beta);

        let mut h = vec![vec![0.0f64; m]; m + 1];
        let mut cs = vec![0.0f64; m];
        let mut sn = vec![0.0f64; m];
        let mut g = vec![0.0f64; m + 1];
        g[0] = beta;

        let mut k_used = 0;
        for j in 0..m {
            let mut w = matvec(&v[j]);
            total_iterations += 1;

            match gs {
                GramSchmidt::Modified => {
                    for i in 0..=j {
                        h[i][j] = w.dot(&v[i]);
                        w -= &v[i] * h[i][j];
                    }
                }
                GramSchmidt::Classical => {
                    for i in 0..=j {
                        h[i][j] = w.dot(&v[i]);
                    }
                    for i in 0..=j {
                        w -= &v[i] * h[i][j];
                    }
                }
            }

            h[j + 1][j] = w.norm();
            if h[j + 1][j] > 1e-14 {
                v.push(&w / h[j + 1][j]);
            } else {
                //lucky breakdown: the Krylov space is exhausted
                v.push(w);
            }

            /* bring column j into triangular form */
            for i in 0..j {
                let temp = cs[i] * h[i][j] + sn[i] * h[i + 1][j];
                h[i + 1][j] = -sn[i] * h[i][j] + cs[i] * h[i + 1][j];
                h[i][j] = temp;
            }
            let denom = (h[j][j] * h[j][j] + h[j + 1][j] * h[j + 1][j]).sqrt();
            if denom == 0.0 {
                cs[j] = 1.0;
                sn[j] = 0.0;
            } else {
                cs[j] = h[j][j] / denom;
                sn[j] = h[j + 1][j] / denom;
            }
            h[j][j] = denom;
            h[j + 1][j] = 0.0;
            g[j + 1] = -sn[j] * g[j];
            g[j] *= cs[j];

            k_used = j + 1;
            if g[j + 1].abs() / b_norm < tolerance {
                break;
            }
        }

        /* back substitution and basis update */
        let mut yk = vec![0.0f64; k_used];
        for i in (0..k_used).rev() {
            let mut s = g[i];
            for l in (i + 1)..k_used {
                s -= h[i][l] * yk[l];
            }
            yk[i] = s / h[i][i];
        }
        for i in 0..k_used {
            x += &v[i] * yk[i];
        }

        let res = (b - matvec(&x)).norm();
        if res / b_norm < tolerance {
            return GmresResult {
                solution: x,
                converged: true,
                iterations: total_iterations,
            };
        }
    }

    GmresResult {
        solution: x,
        converged: false,
        iterations: total_iterations,
    }
}

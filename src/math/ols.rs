//! Weighted least squares solver.
//!
//! Every window fit reduces to a small linear regression:
//!
//! ```text
//! minimize Σ w_i (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - rows are scaled by `sqrt(w_i)` to turn the problem into ordinary least squares
//! - columns are equilibrated to unit max-norm before the solve; the mass column
//!   is ~10^3 while the intercept is 1, and narrow windows make `m` and `ln m`
//!   nearly collinear
//! - the tall system is solved with SVD (nalgebra's `QR::solve` only handles
//!   square systems)

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Weighted least squares with column equilibration.
///
/// `weights` must be finite and positive; `None` is returned otherwise, or when
/// the design matrix has an all-zero column.
pub fn solve_weighted_least_squares(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    weights: &[f64],
) -> Option<DVector<f64>> {
    let (n, p) = x.shape();
    if weights.len() != n || y.len() != n {
        return None;
    }
    if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
        return None;
    }

    let mut xw = x.clone();
    let mut yw = y.clone();
    for i in 0..n {
        let sw = weights[i].sqrt();
        for j in 0..p {
            xw[(i, j)] *= sw;
        }
        yw[i] *= sw;
    }

    let mut scale = vec![0.0; p];
    for j in 0..p {
        let s = xw.column(j).amax();
        if !(s.is_finite() && s > 0.0) {
            return None;
        }
        scale[j] = s;
        xw.column_mut(j).unscale_mut(s);
    }

    let mut beta = solve_least_squares(&xw, &yw)?;
    for j in 0..p {
        beta[j] /= scale[j];
    }
    Some(beta)
}

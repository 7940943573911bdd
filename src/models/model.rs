//! The exponential cross-section model.
//!
//! `σ(m) = exp(a + b·m + c·ln m)`
//!
//! Taking the logarithm gives a model linear in `(a, b, c)` with basis
//! `{1, m, ln m}`, which is what the fitter regresses on. The fitter relies on
//! two primitive operations:
//! - build a design row for a given mass (for OLS)
//! - predict σ(m) given the parameters (for residuals, envelope and plots)

/// Number of model parameters.
pub const N_PARAMS: usize = 3;

/// Fill a log-space design row for the given mass.
///
/// The row includes the constant term first (intercept).
pub fn fill_design_row(mass: f64, out: &mut [f64; N_PARAMS]) {
    out[0] = 1.0;
    out[1] = mass;
    out[2] = mass.ln();
}

/// `ln σ(m)`.
pub fn predict_log(params: &[f64; N_PARAMS], mass: f64) -> f64 {
    params[0] + params[1] * mass + params[2] * mass.ln()
}

/// Predict `σ(m)`.
pub fn predict(params: &[f64; N_PARAMS], mass: f64) -> f64 {
    predict_log(params, mass).exp()
}

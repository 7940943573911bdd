//! Low-level fitting routines for the segmented exponential model.
//!
//! Given a series (nominal, up or down) and a window, we:
//! - select the samples owned by the window
//! - regress `ln σ` on `{1, m, ln m}` (optionally inverse-variance weighted)
//! - return the coefficients `(a, b, c)` of `σ(m) = exp(a + b·m + c·ln m)`
//!
//! All `3 × n_windows` fits are independent and run in parallel.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::debug;

use crate::data::expand::ExpandedSeries;
use crate::domain::{FitWeighting, FitWindow, FittedCurve, SeriesPoint, SeriesVariant};
use crate::error::AppError;
use crate::fit::windows::FitWindows;
use crate::math::solve_weighted_least_squares;
use crate::models::{N_PARAMS, fill_design_row, predict_log};

/// Fitting options that affect how each window is calibrated.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    pub weighting: FitWeighting,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            weighting: FitWeighting::Uniform,
        }
    }
}

/// All fitted curves of a run, addressed by (variant, window index).
#[derive(Debug, Clone)]
pub struct FitSet {
    windows: FitWindows,
    /// Variant-major: `curves[variant.index() * n_windows + window.index]`.
    curves: Vec<FittedCurve>,
}

impl FitSet {
    /// Assemble a set from already fitted (or reloaded) curves.
    ///
    /// Every (variant, window) pair must be present exactly once.
    pub fn from_curves(windows: FitWindows, curves: Vec<FittedCurve>) -> Result<Self, AppError> {
        let n = windows.len();
        let mut slots: Vec<Option<FittedCurve>> = vec![None; SeriesVariant::ALL.len() * n];

        for curve in curves {
            let idx = curve.window.index;
            if idx >= n || windows.as_slice()[idx] != curve.window {
                return Err(AppError::Output(format!(
                    "curve {} does not match the window partition",
                    curve.name()
                )));
            }
            let slot = &mut slots[curve.variant.index() * n + idx];
            if slot.is_some() {
                return Err(AppError::Output(format!("duplicate curve {}", curve.name())));
            }
            *slot = Some(curve);
        }

        let mut out = Vec::with_capacity(slots.len());
        for (i, slot) in slots.into_iter().enumerate() {
            let Some(curve) = slot else {
                let variant = SeriesVariant::ALL[i / n];
                let w = windows.as_slice()[i % n];
                return Err(AppError::Output(format!(
                    "missing {variant} curve for window [{}, {})",
                    w.lo, w.hi
                )));
            };
            out.push(curve);
        }

        Ok(Self { windows, curves: out })
    }

    pub fn windows(&self) -> &FitWindows {
        &self.windows
    }

    /// Number of windows, i.e. fits per variant.
    pub fn n_fits(&self) -> usize {
        self.windows.len()
    }

    pub fn curve(&self, variant: SeriesVariant, window: usize) -> Option<&FittedCurve> {
        if window >= self.windows.len() {
            return None;
        }
        self.curves.get(variant.index() * self.windows.len() + window)
    }

    /// All curves, variant-major.
    pub fn curves(&self) -> &[FittedCurve] {
        &self.curves
    }

    /// Nominal, up and down curves of one window.
    pub fn window_curves(&self, window: usize) -> impl Iterator<Item = &FittedCurve> + '_ {
        SeriesVariant::ALL
            .into_iter()
            .filter_map(move |v| self.curve(v, window))
    }
}

/// Fit every (variant, window) pair.
pub fn fit_all(series: &ExpandedSeries, windows: FitWindows, opts: &FitOptions) -> Result<FitSet, AppError> {
    let jobs: Vec<(SeriesVariant, FitWindow)> = SeriesVariant::ALL
        .iter()
        .flat_map(|&v| windows.iter().map(move |&w| (v, w)))
        .collect();

    let curves = jobs
        .par_iter()
        .map(|&(variant, window)| fit_window(variant, &window, series.get(variant), opts))
        .collect::<Result<Vec<_>, _>>()?;

    FitSet::from_curves(windows, curves)
}

/// Fit one series inside one window.
pub fn fit_window(
    variant: SeriesVariant,
    window: &FitWindow,
    points: &[SeriesPoint],
    opts: &FitOptions,
) -> Result<FittedCurve, AppError> {
    let fail = |reason: String| AppError::Fit {
        variant,
        window: window.index,
        lo: window.lo,
        hi: window.hi,
        reason,
    };

    let selected: Vec<&SeriesPoint> = points.iter().filter(|p| FitWindows::in_fit_range(window, p.mass)).collect();

    let mut distinct: Vec<f64> = selected.iter().map(|p| p.mass).collect();
    distinct.sort_by(|a, b| a.total_cmp(b));
    distinct.dedup();
    if distinct.len() < N_PARAMS {
        return Err(fail(format!(
            "{} distinct masses in window, at least {N_PARAMS} are required",
            distinct.len()
        )));
    }

    let n = selected.len();
    let mut x = DMatrix::<f64>::zeros(n, N_PARAMS);
    let mut y = DVector::<f64>::zeros(n);
    let mut weights = vec![1.0; n];
    let mut row = [0.0; N_PARAMS];

    for (i, p) in selected.iter().enumerate() {
        if !(p.value.is_finite() && p.value > 0.0) {
            return Err(fail(format!(
                "cross-section {} at mass {} is not positive, its logarithm is undefined",
                p.value, p.mass
            )));
        }
        fill_design_row(p.mass, &mut row);
        for j in 0..N_PARAMS {
            x[(i, j)] = row[j];
        }
        y[i] = p.value.ln();

        if opts.weighting == FitWeighting::Error {
            if !(p.unc.is_finite() && p.unc > 0.0) {
                return Err(fail(format!(
                    "uncertainty {} at mass {} cannot be used as a fit weight",
                    p.unc, p.mass
                )));
            }
            // Var(ln σ) ≈ (δσ / σ)^2
            let rel = p.unc / p.value;
            weights[i] = 1.0 / (rel * rel);
        }
    }

    let beta = solve_weighted_least_squares(&x, &y, &weights)
        .ok_or_else(|| fail("least-squares solve did not produce finite coefficients".to_string()))?;
    let params = [beta[0], beta[1], beta[2]];

    let sse: f64 = selected
        .iter()
        .map(|p| {
            let r = p.value.ln() - predict_log(&params, p.mass);
            r * r
        })
        .sum();
    let rms_log = (sse / n as f64).sqrt();

    debug!(
        "fit {variant} window #{} [{}, {}): n={n} a={:.6} b={:.6e} c={:.6} rms(ln σ)={:.3e}",
        window.index, window.lo, window.hi, params[0], params[1], params[2], rms_log
    );

    Ok(FittedCurve {
        variant,
        window: *window,
        params,
        n,
        rms_log,
    })
}

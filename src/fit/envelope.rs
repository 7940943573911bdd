//! Fit-uncertainty envelope from the nominal/up/down curves.
//!
//! At a mass `m` in window `w`:
//!
//! ```text
//! Δ_up   = Up_w(m)  - Nom_w(m)
//! Δ_down = Nom_w(m) - Down_w(m)
//! δ(m)   = max(Δ_up, Δ_down)          (one-sided worst case)
//! f(m)   = δ(m) / Nom_w(m)
//! ```
//!
//! `δ` is clamped at zero: if both shifted fits cross the nominal one the
//! envelope is empty rather than negative.

use crate::domain::{EnvelopeSample, FitWindow, SeriesVariant};
use crate::error::AppError;
use crate::fit::fitter::FitSet;

/// Envelope evaluated at a single mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopePoint {
    pub mass: f64,
    pub window: FitWindow,
    pub nominal: f64,
    pub up: f64,
    pub down: f64,
    /// Absolute envelope (fb).
    pub absolute: f64,
    /// `absolute / nominal`.
    pub fraction: f64,
}

/// Envelope on a regular mass grid (the plotted uncertainty band).
#[derive(Debug, Clone)]
pub struct EnvelopeBand {
    /// Grid spacing (GeV); each sample covers `mass ± step / 2`.
    pub step: f64,
    pub samples: Vec<EnvelopeSample>,
}

/// Evaluate the envelope at `mass`.
///
/// Returns `Ok(None)` when `mass` is outside every window.
pub fn envelope_at(fits: &FitSet, mass: f64) -> Result<Option<EnvelopePoint>, AppError> {
    let Some(window) = fits.windows().locate(mass).copied() else {
        return Ok(None);
    };

    let eval = |variant: SeriesVariant| {
        fits.curve(variant, window.index)
            .map(|c| c.eval(mass))
            .ok_or_else(|| AppError::Output(format!("no {variant} curve for window #{}", window.index)))
    };
    let nominal = eval(SeriesVariant::Nominal)?;
    let up = eval(SeriesVariant::Up)?;
    let down = eval(SeriesVariant::Down)?;

    if nominal == 0.0 || !nominal.is_finite() {
        return Err(AppError::ArithmeticDegeneracy {
            mass,
            context: format!("nominal fit evaluates to {nominal}, envelope fraction is undefined"),
        });
    }

    let absolute = (up - nominal).max(nominal - down).max(0.0);

    Ok(Some(EnvelopePoint {
        mass,
        window,
        nominal,
        up,
        down,
        absolute,
        fraction: absolute / nominal,
    }))
}

/// Upper limit on band grid points.
pub const MAX_BAND_POINTS: usize = 1_000_000;

/// Envelope on `[first boundary, last boundary)` in steps of `step` GeV.
pub fn envelope_band(fits: &FitSet, step: f64) -> Result<EnvelopeBand, AppError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(AppError::Setting(format!("band step must be positive, got {step}")));
    }

    let lo = fits.windows().min_mass();
    let hi = fits.windows().max_mass();
    // Index-based to avoid accumulating rounding in the grid.
    let n = ((hi - lo) / step).ceil();
    if n > MAX_BAND_POINTS as f64 {
        return Err(AppError::Setting(format!(
            "band step {step} GeV gives {n:.0} points over [{lo}, {hi}), at most {MAX_BAND_POINTS} are allowed"
        )));
    }
    let n = n as usize;

    let mut samples = Vec::with_capacity(n);
    for i in 0..n {
        let mass = lo + i as f64 * step;
        if mass >= hi {
            break;
        }
        if let Some(p) = envelope_at(fits, mass)? {
            samples.push(EnvelopeSample { mass, fraction: p.fraction });
        }
    }

    Ok(EnvelopeBand { step, samples })
}

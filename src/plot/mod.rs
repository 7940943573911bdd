//! Diagnostic plot: data preparation and SVG rendering.
//!
//! `PlotData` is the render-only description of the figure; everything is
//! computed up front so the chart code only draws.

use crate::data::registry::InputDescriptor;
use crate::domain::{FitWindow, Sample, SeriesVariant};
use crate::error::AppError;
use crate::fit::envelope::EnvelopeBand;
use crate::fit::fitter::FitSet;

pub mod chart;

pub use chart::render_svg;

/// Points per window when sampling a fitted curve for drawing.
const CURVE_SAMPLES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyleTag {
    Solid,
    Dashed,
}

/// A fitted curve sampled over its own window.
#[derive(Debug, Clone)]
pub struct CurveTrace {
    pub variant: SeriesVariant,
    pub window: FitWindow,
    pub style: LineStyleTag,
    pub points: Vec<(f64, f64)>,
}

/// Actual / fitted at a tabulated mass.
///
/// The error only carries the tabulated uncertainty; the fit uncertainty is
/// drawn separately as the band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioPoint {
    pub mass: f64,
    pub ratio: f64,
    pub err: f64,
}

#[derive(Debug, Clone)]
pub struct PlotData {
    pub title: String,
    pub x_range: (f64, f64),
    pub samples: Vec<Sample>,
    pub curves: Vec<CurveTrace>,
    pub band: EnvelopeBand,
    pub ratio: Vec<RatioPoint>,
}

/// Assemble everything the chart needs.
pub fn build_plot_data(
    descriptor: &InputDescriptor,
    samples: &[Sample],
    fits: &FitSet,
    band: &EnvelopeBand,
) -> Result<PlotData, AppError> {
    let curves = fits
        .curves()
        .iter()
        .map(|c| {
            let (lo, hi) = (c.window.lo, c.window.hi);
            let points = (0..CURVE_SAMPLES)
                .map(|i| {
                    let m = lo + (hi - lo) * i as f64 / (CURVE_SAMPLES - 1) as f64;
                    (m, c.eval(m))
                })
                .collect();
            CurveTrace {
                variant: c.variant,
                window: c.window,
                style: match c.variant {
                    SeriesVariant::Nominal => LineStyleTag::Solid,
                    SeriesVariant::Up | SeriesVariant::Down => LineStyleTag::Dashed,
                },
                points,
            }
        })
        .collect();

    Ok(PlotData {
        title: format!(
            "13 TeV {} {} cross-sections",
            descriptor.grid, descriptor.composition
        ),
        x_range: (fits.windows().min_mass(), fits.windows().max_mass()),
        samples: samples.iter().copied().filter(|s| !s.is_placeholder()).collect(),
        curves,
        band: band.clone(),
        ratio: ratio_points(samples, fits)?,
    })
}

/// Ratio of every tabulated value to the nominal fit of its window.
pub fn ratio_points(samples: &[Sample], fits: &FitSet) -> Result<Vec<RatioPoint>, AppError> {
    let mut out = Vec::with_capacity(samples.len());
    for s in samples {
        if s.is_placeholder() {
            continue;
        }
        let Some(w) = fits.windows().locate(s.mass) else {
            continue;
        };
        let Some(curve) = fits.curve(SeriesVariant::Nominal, w.index) else {
            continue;
        };
        let fit = curve.eval(s.mass);
        if fit == 0.0 || !fit.is_finite() {
            return Err(AppError::ArithmeticDegeneracy {
                mass: s.mass,
                context: format!("nominal fit evaluates to {fit}, ratio is undefined"),
            });
        }
        out.push(RatioPoint {
            mass: s.mass,
            ratio: s.xsec / fit,
            err: s.xsec_unc / fit,
        });
    }
    Ok(out)
}

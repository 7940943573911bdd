//! Reporting utilities: actual vs fitted comparison rows and the terminal table.
//!
//! We keep formatting code in `format` so:
//! - the fitting code stays clean and testable
//! - output changes are localized

use tracing::debug;

use crate::domain::Sample;
use crate::error::AppError;
use crate::fit::envelope::envelope_at;
use crate::fit::fitter::FitSet;

pub mod format;

pub use format::*;

/// One row of the diff table.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffRow {
    pub mass: f64,
    pub window: usize,
    pub xsec: f64,
    pub fit_xsec: f64,
    /// `None` when the tabulated value is zero.
    pub xsec_diff_pct: Option<f64>,
    pub xsec_unc: f64,
    /// Envelope (absolute) at the sample mass.
    pub fit_unc: f64,
    pub unc_diff_pct: Option<f64>,
}

/// `(fitted - actual) / actual × 100`, undefined for a zero reference.
pub fn percent_diff(fitted: f64, actual: f64) -> Option<f64> {
    if actual == 0.0 || !actual.is_finite() {
        return None;
    }
    Some((fitted - actual) / actual * 100.0)
}

/// Compare every tabulated sample against the nominal fit and the envelope.
pub fn compute_diff_rows(samples: &[Sample], fits: &FitSet) -> Result<Vec<DiffRow>, AppError> {
    let mut out = Vec::with_capacity(samples.len());
    for s in samples {
        if s.is_placeholder() {
            continue;
        }
        let Some(p) = envelope_at(fits, s.mass)? else {
            debug!("mass {} is outside every fit window, not reported", s.mass);
            continue;
        };
        out.push(DiffRow {
            mass: s.mass,
            window: p.window.index,
            xsec: s.xsec,
            fit_xsec: p.nominal,
            xsec_diff_pct: percent_diff(p.nominal, s.xsec),
            xsec_unc: s.xsec_unc,
            fit_unc: p.absolute,
            unc_diff_pct: percent_diff(p.absolute, s.xsec_unc),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::expand::expand;
    use crate::fit::fitter::{FitOptions, fit_all};
    use crate::fit::windows::FitWindows;
    use crate::models::predict;

    const LAW: [f64; 3] = [2.0, -0.004, 0.5];

    fn law_fits(samples: &[Sample]) -> FitSet {
        let series = expand(samples).unwrap();
        let windows = FitWindows::from_boundaries(&[100.0, 600.0]).unwrap();
        fit_all(&series, windows, &FitOptions::default()).unwrap()
    }

    fn law_samples() -> Vec<Sample> {
        [100.0, 150.0, 200.0, 300.0, 400.0, 600.0]
            .iter()
            .map(|&m| Sample { mass: m, xsec: predict(&LAW, m), xsec_unc: 0.0 })
            .collect()
    }

    #[test]
    fn exact_law_reports_zero_differences() {
        let samples = law_samples();
        let rows = compute_diff_rows(&samples, &law_fits(&samples)).unwrap();
        assert_eq!(rows.len(), 6);
        for r in &rows {
            assert!(r.xsec_diff_pct.unwrap().abs() < 1e-6);
            assert_eq!(r.fit_unc, 0.0);
            assert_eq!(r.unc_diff_pct, None);
        }

        let table = format_diff_table("C1N2", "wino", &rows);
        let body: Vec<&str> = table.lines().skip(6).take(rows.len()).collect();
        assert_eq!(body.len(), 6);
        for line in body {
            assert!(!line.contains("-0.00"), "{line}");
            assert!(line.contains(" 0.00 "), "{line}");
        }
    }

    #[test]
    fn placeholder_and_out_of_range_masses_are_skipped() {
        let mut samples = law_samples();
        let fits = law_fits(&samples);
        samples.push(Sample { mass: 0.0, xsec: 0.0, xsec_unc: 0.0 });
        samples.push(Sample { mass: 900.0, xsec: 1.0, xsec_unc: 0.0 });

        let rows = compute_diff_rows(&samples, &fits).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows.last().unwrap().mass, 600.0);
    }

    #[test]
    fn percent_diff_guards_zero_reference() {
        assert!((percent_diff(11.0, 10.0).unwrap() - 10.0).abs() < 1e-9);
        assert!((percent_diff(9.0, 10.0).unwrap() + 10.0).abs() < 1e-9);
        assert_eq!(percent_diff(1.0, 0.0), None);
    }
}

//! Read/write the fit JSON file.
//!
//! The fit file is the hand-off to downstream consumers:
//! - `nFits`, the number of windows per variant
//! - every fitted curve with its variant, window bounds and `[a, b, c]`
//! - the tabulated samples as columns (`mass`, `massUnc`, `xsec`, `xsecUnc`)
//!
//! The schema is defined by `domain::FitFile`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::Utc;

use crate::data::registry::InputDescriptor;
use crate::domain::{FitFile, FitFileCurve, FitFileTable, FitWindow, FittedCurve, Sample};
use crate::error::AppError;
use crate::fit::fitter::FitSet;
use crate::fit::windows::FitWindows;

/// Build the file contents for a finished run.
pub fn build_fit_file(descriptor: &InputDescriptor, samples: &[Sample], fits: &FitSet) -> FitFile {
    // Window-major: nom, up, dn for window 0, then window 1, ...
    let mut curves = Vec::with_capacity(fits.curves().len());
    for w in fits.windows().iter() {
        for c in fits.window_curves(w.index) {
            curves.push(FitFileCurve {
                name: c.name(),
                variant: c.variant,
                window: w.index,
                lo: w.lo,
                hi: w.hi,
                params: c.params,
            });
        }
    }

    let mut parameters = FitFileTable::default();
    for s in samples {
        parameters.mass.push(s.mass);
        parameters.mass_unc.push(0.0);
        parameters.xsec.push(s.xsec);
        parameters.xsec_unc.push(s.xsec_unc);
    }

    FitFile {
        tool: "xsec-fit".to_string(),
        generated_at: Utc::now(),
        grid: descriptor.grid,
        composition: descriptor.composition,
        n_fits: fits.n_fits(),
        curves,
        parameters,
    }
}

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, file: &FitFile) -> Result<(), AppError> {
    let out = File::create(path).map_err(|e| AppError::io(format!("Failed to create '{}'", path.display()), e))?;
    let mut writer = BufWriter::new(out);
    serde_json::to_writer_pretty(&mut writer, file)
        .map_err(|e| AppError::Output(format!("Failed to write fit JSON '{}': {e}", path.display())))?;
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush '{}'", path.display()), e))
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path).map_err(|e| AppError::io(format!("Failed to open '{}'", path.display()), e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::Output(format!("Invalid fit JSON '{}': {e}", path.display())))
}

impl FitFile {
    /// Tabulated samples, in file order.
    pub fn samples(&self) -> Vec<Sample> {
        let t = &self.parameters;
        t.mass
            .iter()
            .zip(t.xsec.iter())
            .zip(t.xsec_unc.iter())
            .map(|((&mass, &xsec), &xsec_unc)| Sample { mass, xsec, xsec_unc })
            .collect()
    }

    /// Rebuild the fitted curves, validating the window partition.
    pub fn fit_set(&self) -> Result<FitSet, AppError> {
        let mut bounds: Vec<(usize, f64, f64)> = self.curves.iter().map(|c| (c.window, c.lo, c.hi)).collect();
        bounds.sort_by_key(|b| b.0);
        bounds.dedup_by_key(|b| b.0);

        if bounds.len() != self.n_fits {
            return Err(AppError::Output(format!(
                "fit file declares nFits={} but describes {} windows",
                self.n_fits,
                bounds.len()
            )));
        }
        let mut boundaries: Vec<f64> = bounds.iter().map(|b| b.1).collect();
        if let Some(last) = bounds.last() {
            boundaries.push(last.2);
        }
        let windows = FitWindows::from_boundaries(&boundaries)?;

        let curves = self
            .curves
            .iter()
            .map(|c| FittedCurve {
                variant: c.variant,
                window: FitWindow { index: c.window, lo: c.lo, hi: c.hi },
                params: c.params,
                n: 0,
                rms_log: 0.0,
            })
            .collect();
        FitSet::from_curves(windows, curves)
    }
}

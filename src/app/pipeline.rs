//! The fitting workflow, kept free of presentation.
//!
//! lookup -> ingest -> absolute uncertainties -> nominal/up/down series ->
//! per-window fits -> uncertainty band -> actual vs fitted rows

use tracing::info;

use crate::data::expand::{ExpandedSeries, expand, to_absolute};
use crate::data::registry::lookup;
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::fit::envelope::{EnvelopeBand, envelope_band};
use crate::fit::fitter::{FitOptions, FitSet, fit_all};
use crate::fit::windows::FitWindows;
use crate::io::ingest::{LoadedTable, load_table};
use crate::report::{DiffRow, compute_diff_rows};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Ingested table; samples carry absolute uncertainties.
    pub table: LoadedTable,
    pub series: ExpandedSeries,
    pub fits: FitSet,
    pub band: EnvelopeBand,
    pub rows: Vec<DiffRow>,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &RunConfig) -> Result<RunOutput, AppError> {
    let descriptor = lookup(&config.grid, &config.composition)?;
    let mut table = load_table(&config.input_dir, &descriptor)?;
    to_absolute(&mut table.samples, descriptor.uncertainty);

    let series = expand(&table.samples)?;
    let windows = FitWindows::from_boundaries(descriptor.boundaries)?;
    let opts = FitOptions {
        weighting: config.weighting,
    };
    let fits = fit_all(&series, windows, &opts)?;
    info!(
        "Fitted {} curves over {} windows",
        fits.curves().len(),
        fits.n_fits()
    );

    let band = envelope_band(&fits, config.band_step)?;
    let rows = compute_diff_rows(&table.samples, &fits)?;

    Ok(RunOutput {
        table,
        series,
        fits,
        band,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::domain::{FitWeighting, SeriesVariant};
    use crate::models::predict;

    fn config(grid: &str, composition: &str, input_dir: &Path) -> RunConfig {
        RunConfig {
            grid: grid.to_string(),
            composition: composition.to_string(),
            input_dir: input_dir.to_path_buf(),
            output_dir: PathBuf::from("."),
            weighting: FitWeighting::Uniform,
            band_step: 10.0,
            print: false,
            save: false,
            plot: None,
            export: None,
        }
    }

    fn write_table(dir: &Path, name: &str, masses: impl Iterator<Item = f64>, fractional: bool) {
        let mut text = String::new();
        for mass in masses {
            let xsec = predict(&[9.0, -0.002, -0.9], mass);
            let unc = if fractional { 0.05 } else { 0.05 * xsec };
            text.push_str(&format!("{mass} {xsec:.12e} {unc:.12e}\n"));
        }
        std::fs::write(dir.join(name), text).unwrap();
    }

    #[test]
    fn absolute_table_runs_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let masses = (0..77).map(|i| 100.0 + 25.0 * i as f64);
        write_table(dir.path(), "xsec_C1N2_wino.txt", masses, false);

        let out = run_fit(&config("C1N2", "wino", dir.path())).unwrap();
        assert_eq!(out.fits.n_fits(), 10);
        assert_eq!(out.fits.curves().len(), 30);
        assert_eq!(out.rows.len(), 77);
        assert_eq!(out.band.samples.len(), 190);

        for sample in &out.band.samples {
            assert!((sample.fraction - 0.05).abs() < 1e-6, "mass {}", sample.mass);
        }
        for row in &out.rows {
            assert!(row.xsec_diff_pct.unwrap().abs() < 1e-6);
        }
    }

    #[test]
    fn fractional_slepton_table_becomes_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let masses = (0..=195).map(|i| 50.0 + 10.0 * i as f64);
        write_table(dir.path(), "xsec_SlepSlep_left.txt", masses, true);

        let out = run_fit(&config("SlepSlep", "left", dir.path())).unwrap();
        let s = out.table.samples[0];
        assert!((s.xsec_unc - 0.05 * s.xsec).abs() < 1e-12 * s.xsec);

        let up = out.series.get(SeriesVariant::Up)[0];
        assert!((up.value - 1.05 * s.xsec).abs() < 1e-9 * s.xsec);
        assert_eq!(out.band.samples.len(), 195);
    }

    #[test]
    fn placeholder_row_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let masses = (0..76).map(|i| 100.0 + 25.0 * i as f64);
        write_table(dir.path(), "xsec_C1C1_wino.txt", masses, false);
        let path = dir.path().join("xsec_C1C1_wino.txt");
        let mut text = std::fs::read_to_string(&path).unwrap();
        text.push_str("0 0 0\n");
        std::fs::write(&path, text).unwrap();

        let out = run_fit(&config("C1C1", "wino", dir.path())).unwrap();
        assert_eq!(out.table.samples.len(), 77);
        assert_eq!(out.series.nominal.len(), 76);
        assert_eq!(out.rows.len(), 76);
        assert!(out.rows.iter().all(|r| r.mass >= 100.0));
    }

    #[test]
    fn published_slepton_table_is_too_sparse_to_fit() {
        let dir = tempfile::tempdir().unwrap();
        let masses = (1..=10).map(|i| 50.0 * i as f64);
        write_table(dir.path(), "xsec_SlepSlep_right.txt", masses, true);

        let err = run_fit(&config("SlepSlep", "right", dir.path())).unwrap_err();
        assert!(matches!(err, AppError::Fit { .. }), "{err}");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn tiny_band_step_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let masses = (0..77).map(|i| 100.0 + 25.0 * i as f64);
        write_table(dir.path(), "xsec_C1N2_hino.txt", masses, false);

        let mut cfg = config("C1N2", "hino", dir.path());
        cfg.band_step = 1e-13;
        assert!(matches!(run_fit(&cfg), Err(AppError::Setting(_))));
    }

    #[test]
    fn unknown_pair_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_fit(&config("C1N2", "left", dir.path())).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_table_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_fit(&config("N1N2", "hino", dir.path())).unwrap_err();
        assert!(matches!(err, AppError::InputFormat { .. }));
    }
}

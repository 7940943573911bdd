//! Command-line parsing for the cross-section fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting code. Grid and composition stay plain strings here: an unknown
//! combination is reported by the registry with the list of valid pairs,
//! rather than rejected by clap.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::FitWeighting;

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "xsec-fit",
    version,
    about = "Piecewise exponential fits of tabulated SUSY cross-sections"
)]
pub struct Cli {
    /// Grid to fit (C1N2, C1pN2, C1mN2, C1C1, N1N2, CN, SlepSlep).
    #[arg(default_value = "C1N2")]
    pub grid: String,

    /// Composition (wino, hino, left, right).
    #[arg(default_value = "wino")]
    pub composition: String,

    /// Directory holding the `xsec_<grid>_<composition>.txt` tables.
    #[arg(long, env = "XSEC_INPUT_DIR", default_value = "Inputs")]
    pub input_dir: PathBuf,

    /// Directory for the fit JSON and the plot.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Regression weighting in log space.
    #[arg(long, value_enum, default_value_t = FitWeighting::Uniform)]
    pub weighting: FitWeighting,

    /// Mass step (GeV) of the uncertainty band.
    #[arg(long, default_value_t = 10.0)]
    pub step: f64,

    /// Do not print the actual vs fitted table.
    #[arg(long)]
    pub no_print: bool,

    /// Do not write the fit JSON file.
    #[arg(long)]
    pub no_save: bool,

    /// Do not render the SVG plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot path (defaults to `<output-dir>/<grid>_<composition>_13TeV.svg`).
    #[arg(long, value_name = "SVG")]
    pub plot: Option<PathBuf>,

    /// Export the actual vs fitted table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Debug-level logging (overridden by `RUST_LOG`).
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_invocation() {
        let cli = Cli::parse_from(["xsec-fit"]);
        assert_eq!(cli.grid, "C1N2");
        assert_eq!(cli.composition, "wino");
        assert_eq!(cli.step, 10.0);
        assert!(!cli.no_print && !cli.no_save && !cli.no_plot);
        assert_eq!(cli.weighting, FitWeighting::Uniform);
    }

    #[test]
    fn positionals_and_flags() {
        let cli = Cli::parse_from([
            "xsec-fit",
            "SlepSlep",
            "left",
            "--input-dir",
            "tables",
            "--weighting",
            "error",
            "--no-save",
        ]);
        assert_eq!(cli.grid, "SlepSlep");
        assert_eq!(cli.composition, "left");
        assert_eq!(cli.input_dir, PathBuf::from("tables"));
        assert_eq!(cli.weighting, FitWeighting::Error);
        assert!(cli.no_save);
    }
}

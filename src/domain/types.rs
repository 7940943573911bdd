//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later by downstream consumers

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Tabulated production process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grid {
    C1N2,
    C1pN2,
    C1mN2,
    C1C1,
    N1N2,
    CN,
    SlepSlep,
}

impl Grid {
    pub const ALL: [Grid; 7] = [
        Grid::C1N2,
        Grid::C1pN2,
        Grid::C1mN2,
        Grid::C1C1,
        Grid::N1N2,
        Grid::CN,
        Grid::SlepSlep,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Grid::C1N2 => "C1N2",
            Grid::C1pN2 => "C1pN2",
            Grid::C1mN2 => "C1mN2",
            Grid::C1C1 => "C1C1",
            Grid::N1N2 => "N1N2",
            Grid::CN => "CN",
            Grid::SlepSlep => "SlepSlep",
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names are matched exactly (case-sensitive).
impl FromStr for Grid {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::ALL.into_iter().find(|g| g.name() == s).ok_or(())
    }
}

/// Model assumption distinguishing otherwise identical grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    Wino,
    Hino,
    Left,
    Right,
}

impl Composition {
    pub const ALL: [Composition; 4] = [
        Composition::Wino,
        Composition::Hino,
        Composition::Left,
        Composition::Right,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Composition::Wino => "wino",
            Composition::Hino => "hino",
            Composition::Left => "left",
            Composition::Right => "right",
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Composition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Composition::ALL.into_iter().find(|c| c.name() == s).ok_or(())
    }
}

/// Masses below this are placeholder rows: never fitted, reported or plotted.
pub const PLACEHOLDER_MASS: f64 = 1e-3;

/// One tabulated row: mass [GeV], cross-section [fb] and its uncertainty [fb].
///
/// Masses carry no uncertainty in the input tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub mass: f64,
    pub xsec: f64,
    pub xsec_unc: f64,
}

impl Sample {
    pub fn is_placeholder(&self) -> bool {
        self.mass < PLACEHOLDER_MASS
    }
}

/// Which cross-section series a fit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesVariant {
    Nominal,
    Up,
    Down,
}

impl SeriesVariant {
    pub const ALL: [SeriesVariant; 3] = [SeriesVariant::Nominal, SeriesVariant::Up, SeriesVariant::Down];

    /// Short tag used in curve names (`fit_nom_100_150`).
    pub fn tag(self) -> &'static str {
        match self {
            SeriesVariant::Nominal => "nom",
            SeriesVariant::Up => "up",
            SeriesVariant::Down => "dn",
        }
    }

    pub fn index(self) -> usize {
        match self {
            SeriesVariant::Nominal => 0,
            SeriesVariant::Up => 1,
            SeriesVariant::Down => 2,
        }
    }
}

impl fmt::Display for SeriesVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeriesVariant::Nominal => "nominal",
            SeriesVariant::Up => "up",
            SeriesVariant::Down => "down",
        })
    }
}

/// A point of one series variant: value and (pseudo-)uncertainty at a mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub mass: f64,
    pub value: f64,
    pub unc: f64,
}

/// Mass interval owned by one independent regression.
///
/// Membership is `[lo, hi)`, except for the final window of a partition,
/// which also contains `hi` (see `FitWindows::locate`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitWindow {
    pub index: usize,
    pub lo: f64,
    pub hi: f64,
}

/// Fitted `σ(m) = exp(a + b·m + c·ln m)` for one (variant, window) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCurve {
    pub variant: SeriesVariant,
    pub window: FitWindow,
    /// `[a, b, c]`.
    pub params: [f64; 3],
    /// Number of samples used by the regression.
    pub n: usize,
    /// RMS residual of `ln σ` over the fitted samples.
    pub rms_log: f64,
}

impl FittedCurve {
    pub fn eval(&self, mass: f64) -> f64 {
        crate::models::predict(&self.params, mass)
    }

    /// Stable name used by the output file, e.g. `fit_up_200_300`.
    pub fn name(&self) -> String {
        format!(
            "fit_{}_{}_{}",
            self.variant.tag(),
            self.window.lo,
            self.window.hi
        )
    }
}

/// Fit-uncertainty fraction at one mass of the regular band grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSample {
    pub mass: f64,
    pub fraction: f64,
}

/// How samples are weighted in the log-space regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FitWeighting {
    /// Ordinary least squares on `ln σ`.
    Uniform,
    /// Inverse variance of `ln σ`, i.e. `(σ / δσ)^2`.
    Error,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub grid: String,
    pub composition: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub weighting: FitWeighting,
    /// Mass step [GeV] of the uncertainty band grid.
    pub band_step: f64,

    pub print: bool,
    pub save: bool,
    pub plot: Option<PathBuf>,
    pub export: Option<PathBuf>,
}

/// The persisted fit file (JSON).
///
/// Field names are part of the hand-off contract with downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub grid: Grid,
    pub composition: Composition,
    pub n_fits: usize,
    pub curves: Vec<FitFileCurve>,
    pub parameters: FitFileTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitFileCurve {
    pub name: String,
    pub variant: SeriesVariant,
    pub window: usize,
    pub lo: f64,
    pub hi: f64,
    pub params: [f64; 3],
}

/// Column-wise table of the tabulated samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitFileTable {
    pub mass: Vec<f64>,
    pub mass_unc: Vec<f64>,
    pub xsec: Vec<f64>,
    pub xsec_unc: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_case_sensitively() {
        assert_eq!("SlepSlep".parse::<Grid>(), Ok(Grid::SlepSlep));
        assert_eq!("c1n2".parse::<Grid>(), Err(()));
        assert_eq!("hino".parse::<Composition>(), Ok(Composition::Hino));
        assert_eq!("Hino".parse::<Composition>(), Err(()));
    }

    #[test]
    fn curve_name_uses_window_bounds() {
        let curve = FittedCurve {
            variant: SeriesVariant::Down,
            window: FitWindow { index: 3, lo: 300.0, hi: 400.0 },
            params: [0.0, 0.0, 0.0],
            n: 5,
            rms_log: 0.0,
        };
        assert_eq!(curve.name(), "fit_dn_300_400");
    }
}

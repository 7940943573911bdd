//! Registry of supported (grid, composition) tables.
//!
//! Every lookup happens before any file is touched, so an unsupported pair
//! never produces partial output.

use crate::domain::{Composition, Grid};
use crate::error::AppError;

/// Window boundaries [GeV] shared by the chargino/neutralino grids.
pub const STANDARD_BOUNDARIES: [f64; 11] = [
    100.0, 150.0, 200.0, 300.0, 400.0, 600.0, 800.0, 1000.0, 1200.0, 1500.0, 2000.0,
];

/// Slepton pairs: 50 GeV steps up to 500, the last window runs to 2000.
pub const SLEPTON_BOUNDARIES: [f64; 11] = [
    50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0, 2000.0,
];

/// Uncertainty column convention of an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UncertaintyKind {
    /// Absolute, in fb.
    Absolute,
    /// Relative to the nominal cross-section.
    Fractional,
}

/// Everything needed to load and fit one table.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDescriptor {
    pub grid: Grid,
    pub composition: Composition,
    /// Number of rows in the published table (informational).
    pub expected_points: usize,
    pub uncertainty: UncertaintyKind,
    pub boundaries: &'static [f64],
}

impl InputDescriptor {
    pub fn file_name(&self) -> String {
        format!("xsec_{}_{}.txt", self.grid, self.composition)
    }

    /// Stem for output artifacts, e.g. `C1N2_wino_13TeV`.
    pub fn output_stem(&self) -> String {
        format!("{}_{}_13TeV", self.grid, self.composition)
    }
}

/// Compositions available for a grid.
pub fn compositions_for(grid: Grid) -> &'static [Composition] {
    match grid {
        Grid::C1N2 | Grid::C1pN2 | Grid::C1mN2 | Grid::C1C1 => &[Composition::Wino, Composition::Hino],
        Grid::N1N2 | Grid::CN => &[Composition::Hino],
        Grid::SlepSlep => &[Composition::Left, Composition::Right],
    }
}

/// All whitelisted pairs, in registry order.
pub fn supported_pairs() -> Vec<(Grid, Composition)> {
    Grid::ALL
        .into_iter()
        .flat_map(|g| compositions_for(g).iter().map(move |&c| (g, c)))
        .collect()
}

/// Resolve user-supplied names to a descriptor.
pub fn lookup(grid: &str, composition: &str) -> Result<InputDescriptor, AppError> {
    let config_error = || AppError::Configuration {
        grid: grid.to_string(),
        composition: composition.to_string(),
        valid: describe_supported(),
    };

    let g: Grid = grid.parse().map_err(|_| config_error())?;
    let c: Composition = composition.parse().map_err(|_| config_error())?;
    if !compositions_for(g).contains(&c) {
        return Err(config_error());
    }

    Ok(match g {
        Grid::SlepSlep => InputDescriptor {
            grid: g,
            composition: c,
            expected_points: 10,
            uncertainty: UncertaintyKind::Fractional,
            boundaries: &SLEPTON_BOUNDARIES,
        },
        _ => InputDescriptor {
            grid: g,
            composition: c,
            expected_points: 77,
            uncertainty: UncertaintyKind::Absolute,
            boundaries: &STANDARD_BOUNDARIES,
        },
    })
}

/// Human-readable list of valid pairs, one grid per line.
pub fn describe_supported() -> String {
    Grid::ALL
        .iter()
        .map(|g| {
            let comps: Vec<&str> = compositions_for(*g).iter().map(|c| c.name()).collect();
            format!("  {:<9} {}", g.name(), comps.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_matches_known_pairs() {
        let pairs = supported_pairs();
        assert_eq!(pairs.len(), 4 * 2 + 2 + 2);
        assert!(pairs.contains(&(Grid::CN, Composition::Hino)));
        assert!(!pairs.contains(&(Grid::CN, Composition::Wino)));
        assert!(pairs.contains(&(Grid::SlepSlep, Composition::Right)));
    }

    #[test]
    fn lookup_rejects_unsupported_pairs() {
        for (grid, comp) in [("N1N2", "wino"), ("SlepSlep", "hino"), ("C1N2", "left"), ("C2N2", "wino")] {
            let err = lookup(grid, comp).unwrap_err();
            assert!(matches!(err, AppError::Configuration { .. }), "{grid} {comp}");
            assert!(err.to_string().contains("SlepSlep  left, right"));
        }
    }

    #[test]
    fn lookup_builds_descriptor() {
        let d = lookup("C1C1", "hino").unwrap();
        assert_eq!(d.file_name(), "xsec_C1C1_hino.txt");
        assert_eq!(d.output_stem(), "C1C1_hino_13TeV");
        assert_eq!(d.expected_points, 77);
        assert_eq!(d.uncertainty, UncertaintyKind::Absolute);

        let s = lookup("SlepSlep", "left").unwrap();
        assert_eq!(s.expected_points, 10);
        assert_eq!(s.uncertainty, UncertaintyKind::Fractional);
        assert_eq!(s.boundaries[0], 50.0);
        assert_eq!(s.boundaries[10], 2000.0);
    }
}

//! Partition of the mass axis into fit windows.
//!
//! A window owns `[lo, hi)`, the last one also its upper bound. Ownership is
//! what the envelope, the ratio points and the report evaluate against, so a
//! sample on a border always belongs to the window on its right.
//!
//! Fits select samples on the closed range `[lo, hi]`: border samples
//! constrain both neighbouring curves.

use crate::domain::FitWindow;
use crate::error::AppError;

/// An ordered, contiguous set of fit windows.
#[derive(Debug, Clone, PartialEq)]
pub struct FitWindows {
    windows: Vec<FitWindow>,
}

impl FitWindows {
    /// Build windows from strictly increasing boundaries (at least two).
    pub fn from_boundaries(boundaries: &[f64]) -> Result<Self, AppError> {
        if boundaries.len() < 2 {
            return Err(AppError::Setting(format!(
                "at least two window boundaries are required, got {}",
                boundaries.len()
            )));
        }
        if boundaries.iter().any(|b| !b.is_finite() || *b <= 0.0) {
            return Err(AppError::Setting(
                "window boundaries must be finite, positive masses".to_string(),
            ));
        }
        if boundaries.windows(2).any(|w| w[1] <= w[0]) {
            return Err(AppError::Setting(
                "window boundaries must be strictly increasing".to_string(),
            ));
        }

        let windows = boundaries
            .windows(2)
            .enumerate()
            .map(|(index, w)| FitWindow { index, lo: w[0], hi: w[1] })
            .collect();
        Ok(Self { windows })
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FitWindow> {
        self.windows.iter()
    }

    pub fn as_slice(&self) -> &[FitWindow] {
        &self.windows
    }

    /// Lower bound of the first window.
    pub fn min_mass(&self) -> f64 {
        self.windows[0].lo
    }

    /// Upper bound of the last window.
    pub fn max_mass(&self) -> f64 {
        self.windows[self.windows.len() - 1].hi
    }

    /// Whether `mass` belongs to `window` under the partition's rule.
    pub fn contains(&self, window: &FitWindow, mass: f64) -> bool {
        let is_last = window.index + 1 == self.windows.len();
        mass >= window.lo && (mass < window.hi || (is_last && mass == window.hi))
    }

    /// Whether `mass` is used when fitting `window`.
    pub fn in_fit_range(window: &FitWindow, mass: f64) -> bool {
        mass >= window.lo && mass <= window.hi
    }

    /// Find the window owning `mass`, if any.
    pub fn locate(&self, mass: f64) -> Option<&FitWindow> {
        if !mass.is_finite() || mass < self.min_mass() || mass > self.max_mass() {
            return None;
        }
        self.windows.iter().find(|w| self.contains(w, mass))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::registry::{SLEPTON_BOUNDARIES, STANDARD_BOUNDARIES};

    #[test]
    fn partitions_are_contiguous() {
        for boundaries in [&STANDARD_BOUNDARIES[..], &SLEPTON_BOUNDARIES[..]] {
            let windows = FitWindows::from_boundaries(boundaries).unwrap();
            assert_eq!(windows.len(), 10);
            for pair in windows.as_slice().windows(2) {
                assert_eq!(pair[0].hi, pair[1].lo);
                assert_eq!(pair[0].index + 1, pair[1].index);
            }
        }
    }

    #[test]
    fn borders_belong_to_the_right_window() {
        let windows = FitWindows::from_boundaries(&STANDARD_BOUNDARIES).unwrap();
        assert_eq!(windows.locate(100.0).unwrap().index, 0);
        assert_eq!(windows.locate(149.999).unwrap().index, 0);
        assert_eq!(windows.locate(150.0).unwrap().index, 1);
        assert_eq!(windows.locate(1999.0).unwrap().index, 9);
    }

    #[test]
    fn last_window_owns_its_upper_bound() {
        let windows = FitWindows::from_boundaries(&STANDARD_BOUNDARIES).unwrap();
        assert_eq!(windows.locate(2000.0).unwrap().index, 9);
        assert!(windows.locate(2000.5).is_none());
        assert!(windows.locate(99.0).is_none());
        assert!(windows.locate(0.0).is_none());
    }

    #[test]
    fn every_grid_mass_has_exactly_one_owner() {
        let windows = FitWindows::from_boundaries(&STANDARD_BOUNDARIES).unwrap();
        for i in 0..77 {
            let mass = 100.0 + 25.0 * i as f64;
            let owners = windows.iter().filter(|w| windows.contains(w, mass)).count();
            assert_eq!(owners, 1, "mass {mass}");
        }
    }

    #[test]
    fn fit_range_shares_borders() {
        let windows = FitWindows::from_boundaries(&STANDARD_BOUNDARIES).unwrap();
        let [first, second] = [windows.as_slice()[0], windows.as_slice()[1]];
        assert!(FitWindows::in_fit_range(&first, 150.0));
        assert!(FitWindows::in_fit_range(&second, 150.0));
        assert!(!windows.contains(&first, 150.0));
        assert!(!FitWindows::in_fit_range(&first, 150.5));
    }

    #[test]
    fn rejects_unordered_boundaries() {
        assert!(FitWindows::from_boundaries(&[100.0]).is_err());
        assert!(FitWindows::from_boundaries(&[100.0, 100.0]).is_err());
        assert!(FitWindows::from_boundaries(&[200.0, 100.0, 300.0]).is_err());
    }
}

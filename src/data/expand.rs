//! Uncertainty expansion: nominal, +1σ and −1σ series.
//!
//! The shifted series reuse the nominal fractional uncertainty as their own
//! pseudo-uncertainty. This keeps the three fits consistent across window
//! borders; it is not a propagated error.

use tracing::debug;

use crate::data::registry::UncertaintyKind;
use crate::domain::{Sample, SeriesPoint, SeriesVariant};
use crate::error::AppError;

/// The three series fitted independently.
#[derive(Debug, Clone)]
pub struct ExpandedSeries {
    pub nominal: Vec<SeriesPoint>,
    pub up: Vec<SeriesPoint>,
    pub down: Vec<SeriesPoint>,
}

impl ExpandedSeries {
    pub fn get(&self, variant: SeriesVariant) -> &[SeriesPoint] {
        match variant {
            SeriesVariant::Nominal => &self.nominal,
            SeriesVariant::Up => &self.up,
            SeriesVariant::Down => &self.down,
        }
    }
}

/// Convert fractional uncertainties to absolute ones (fb).
///
/// Must run before expansion; a no-op for tables that are already absolute.
pub fn to_absolute(samples: &mut [Sample], kind: UncertaintyKind) {
    if kind == UncertaintyKind::Fractional {
        for s in samples.iter_mut() {
            s.xsec_unc *= s.xsec;
        }
    }
}

/// Build the nominal/up/down series from absolute-uncertainty samples.
///
/// Placeholder rows are left out of every series.
pub fn expand(samples: &[Sample]) -> Result<ExpandedSeries, AppError> {
    let mut nominal = Vec::with_capacity(samples.len());
    let mut up = Vec::with_capacity(samples.len());
    let mut down = Vec::with_capacity(samples.len());

    for (i, s) in samples.iter().enumerate() {
        if s.is_placeholder() {
            debug!("row {} has placeholder mass {}, not fitted", i + 1, s.mass);
            continue;
        }
        if s.xsec == 0.0 || !s.xsec.is_finite() {
            return Err(AppError::ArithmeticDegeneracy {
                mass: s.mass,
                context: format!(
                    "nominal cross-section {} at row {} cannot define a fractional uncertainty",
                    s.xsec,
                    i + 1
                ),
            });
        }
        let frac = s.xsec_unc / s.xsec;

        let y_up = s.xsec + s.xsec_unc;
        let y_dn = s.xsec - s.xsec_unc;

        nominal.push(SeriesPoint { mass: s.mass, value: s.xsec, unc: s.xsec_unc });
        up.push(SeriesPoint { mass: s.mass, value: y_up, unc: y_up * frac });
        down.push(SeriesPoint { mass: s.mass, value: y_dn, unc: y_dn * frac });
    }

    Ok(ExpandedSeries { nominal, up, down })
}

//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - registry keys (`Grid`, `Composition`)
//! - tabulated samples and the derived series (`Sample`, `SeriesPoint`, `SeriesVariant`)
//! - fit outputs (`FitWindow`, `FittedCurve`, `EnvelopeSample`)
//! - the persisted file schema (`FitFile`)

pub mod types;

pub use types::*;

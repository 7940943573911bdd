//! Segmented curve fitting.
//!
//! Responsibilities:
//!
//! - partition the mass axis into fit windows
//! - fit nominal/up/down series in every window (parallel)
//! - combine the three fits into the uncertainty envelope

pub mod envelope;
pub mod fitter;
pub mod windows;

pub use envelope::*;
pub use fitter::*;
pub use windows::*;

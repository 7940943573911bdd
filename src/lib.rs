//! `xsec-fit` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - the fitting workflow is testable without spawning processes
//! - fitted curves can be reloaded and evaluated by other tools
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;

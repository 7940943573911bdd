//! Input/output helpers.
//!
//! - cross-section table ingest (`ingest`)
//! - diff table export to CSV (`export`)
//! - fit JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;

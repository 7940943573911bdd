//! Input tables: the (grid, composition) registry and the derived series.

pub mod expand;
pub mod registry;

pub use expand::*;
pub use registry::*;

//! Incremental elevation grid: turns sparse, irregular elevation samples
//! into a regular lon/lat raster the search layer can run A* over.

pub mod error;
pub mod grid;
pub mod ingest;

pub use error::{GridError, Result};
pub use grid::{CellIndex, Grid, RawIndex};

//! Trimming of gridded ice-sheet datasets to the ice body connected to the
//! centre of the domain, ahead of mesh generation.

pub mod config;
pub mod dataset;
pub mod error;
pub mod fields;
pub mod flood_fill;
pub mod grid;
pub mod pipeline;
pub mod synthetic;
pub mod visualisation;

pub use error::FloodFillError;
pub use fields::IceFields;
pub use flood_fill::{flood_fill, BoundaryPolicy, ConnectivityFilter, FilterOutcome, FilterStats};
pub use grid::Grid;

use thiserror::Error;

/// Failures the connectivity filter reports to its caller.
///
/// A seed cell without ice is not an error: the filter returns an
/// all-zero thickness field in that case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FloodFillError {
    #[error("Grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("Field '{field}' has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        field: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("A border of {width} cells around a {rows}x{cols} grid does not fit in memory")]
    PaddingTooWide {
        width: usize,
        rows: usize,
        cols: usize,
    },

    /// The ice body connected to the seed reaches the edge of the grid.
    /// Pad the input with a non-ice border or use `BoundaryPolicy::Clip`.
    #[error(
        "Ice connected to the seed touches the grid boundary at ({row}, {col}) \
         on a {rows}x{cols} grid; pad the domain with a non-ice border"
    )]
    OutOfBoundsExpansion {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

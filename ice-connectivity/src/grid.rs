use crate::error::FloodFillError;

/// Axis-aligned neighbour offsets (row, col): down, up, right, left.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub rows: usize, // Number of cells along the first axis
    pub cols: usize, // Number of cells along the second axis
    pub dx: f64,     // Cell width along columns (meters)
    pub dy: f64,     // Cell height along rows (meters)
}

impl Grid {
    pub fn new(rows: usize, cols: usize, dx: f64, dy: f64) -> Self {
        Grid { rows, cols, dx, dy }
    }

    /// Grid with unit spacing, for callers that only care about shape.
    pub fn from_shape((rows, cols): (usize, usize)) -> Self {
        Grid::new(rows, cols, 1.0, 1.0)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn ensure_non_empty(&self) -> Result<(), FloodFillError> {
        if self.is_empty() {
            return Err(FloodFillError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// The fixed flood-fill seed: the centre cell, rounded down.
    pub fn seed(&self) -> (usize, usize) {
        (self.rows / 2, self.cols / 2)
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Neighbour of `(row, col)` shifted by `offset`, or `None` if it falls
    /// outside the grid.
    pub fn neighbor(&self, row: usize, col: usize, offset: (isize, isize)) -> Option<(usize, usize)> {
        let r = row.checked_add_signed(offset.0)?;
        let c = col.checked_add_signed(offset.1)?;
        self.in_bounds(r, c).then_some((r, c))
    }

    pub fn cell_area(&self) -> f64 {
        self.dx * self.dy
    }

    pub fn x_coord(&self, col: usize) -> f64 {
        self.dx * (col as f64)
    }

    pub fn y_coord(&self, row: usize) -> f64 {
        self.dy * (row as f64)
    }

    pub fn width(&self) -> f64 {
        self.cols.saturating_sub(1) as f64 * self.dx
    }

    pub fn height(&self) -> f64 {
        self.rows.saturating_sub(1) as f64 * self.dy
    }
}

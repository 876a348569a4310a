use crate::error::FloodFillError;
use crate::grid::Grid;
use ndarray::{s, Array2, Zip};

/// Ice thickness and the two co-located velocity components of a gridded
/// dataset. All three arrays always share one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct IceFields {
    pub thickness: Array2<f64>,  // meters, zero where there is no ice
    pub velocity_x: Array2<f64>, // meaningless where thickness is zero
    pub velocity_y: Array2<f64>,
}

impl IceFields {
    pub fn new(
        thickness: Array2<f64>,
        velocity_x: Array2<f64>,
        velocity_y: Array2<f64>,
    ) -> Result<Self, FloodFillError> {
        let expected = thickness.dim();
        Grid::from_shape(expected).ensure_non_empty()?;
        for (field, array) in [("velocity_x", &velocity_x), ("velocity_y", &velocity_y)] {
            if array.dim() != expected {
                return Err(FloodFillError::ShapeMismatch {
                    field,
                    expected,
                    found: array.dim(),
                });
            }
        }
        Ok(IceFields {
            thickness,
            velocity_x,
            velocity_y,
        })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        IceFields {
            thickness: Array2::zeros((rows, cols)),
            velocity_x: Array2::zeros((rows, cols)),
            velocity_y: Array2::zeros((rows, cols)),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.thickness.dim()
    }

    /// Set every cell where `keep` is false to 0.0 in all three arrays.
    pub fn mask_in_place(&mut self, keep: &Array2<bool>) {
        Zip::from(&mut self.thickness)
            .and(&mut self.velocity_x)
            .and(&mut self.velocity_y)
            .and(keep)
            .par_for_each(|thk, vx, vy, &kept| {
                if !kept {
                    *thk = 0.0;
                    *vx = 0.0;
                    *vy = 0.0;
                }
            });
    }

    /// Surround the fields with a non-ice border `width` cells wide.
    pub fn pad(&self, width: usize) -> Result<IceFields, FloodFillError> {
        let (rows, cols) = self.dim();
        let too_wide = FloodFillError::PaddingTooWide { width, rows, cols };
        let border = width.checked_mul(2).ok_or(too_wide.clone())?;
        let padded_rows = rows.checked_add(border).ok_or(too_wide.clone())?;
        let padded_cols = cols.checked_add(border).ok_or(too_wide.clone())?;
        padded_rows
            .checked_mul(padded_cols)
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<f64>()))
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or(too_wide)?;
        let mut out = IceFields::zeros(padded_rows, padded_cols);
        let interior = s![width..width + rows, width..width + cols];
        out.thickness.slice_mut(interior).assign(&self.thickness);
        out.velocity_x.slice_mut(interior).assign(&self.velocity_x);
        out.velocity_y.slice_mut(interior).assign(&self.velocity_y);
        Ok(out)
    }

    /// Inverse of [`IceFields::pad`]: crop `width` cells from every side.
    pub fn unpad(&self, width: usize) -> Result<IceFields, FloodFillError> {
        let (rows, cols) = self.dim();
        if 2 * width >= rows || 2 * width >= cols {
            return Err(FloodFillError::EmptyGrid {
                rows: rows.saturating_sub(2 * width),
                cols: cols.saturating_sub(2 * width),
            });
        }
        let interior = s![width..rows - width, width..cols - width];
        Ok(IceFields {
            thickness: self.thickness.slice(interior).to_owned(),
            velocity_x: self.velocity_x.slice(interior).to_owned(),
            velocity_y: self.velocity_y.slice(interior).to_owned(),
        })
    }

    pub fn ice_cell_count(&self) -> usize {
        self.thickness.iter().filter(|&&thk| thk > 0.0).count()
    }

    /// Total ice volume in cubic meters.
    pub fn ice_volume(&self, grid: &Grid) -> f64 {
        let summed: f64 = self.thickness.iter().filter(|&&thk| thk > 0.0).sum();
        summed * grid.cell_area()
    }

    pub fn max_thickness(&self) -> f64 {
        self.thickness.iter().copied().fold(0.0_f64, f64::max)
    }

    pub fn velocity_magnitude(&self) -> Array2<f64> {
        let mut mag = Array2::<f64>::zeros(self.dim());
        Zip::from(&mut mag)
            .and(&self.velocity_x)
            .and(&self.velocity_y)
            .for_each(|m, &vx, &vy| *m = vx.hypot(vy));
        mag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn sample() -> IceFields {
        IceFields::new(
            array![[0.0, 2.0], [3.0, 0.0]],
            array![[1.0, 3.0], [-4.0, 5.0]],
            array![[1.0, 4.0], [0.0, 5.0]],
        )
        .unwrap()
    }

    #[test]
    fn rejects_mismatched_velocity_shape() {
        let err = IceFields::new(
            Array2::zeros((3, 3)),
            Array2::zeros((3, 3)),
            Array2::zeros((3, 2)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            FloodFillError::ShapeMismatch {
                field: "velocity_y",
                expected: (3, 3),
                found: (3, 2),
            }
        );
    }

    #[test]
    fn rejects_empty_arrays() {
        let err = IceFields::new(
            Array2::zeros((0, 4)),
            Array2::zeros((0, 4)),
            Array2::zeros((0, 4)),
        )
        .unwrap_err();
        assert!(matches!(err, FloodFillError::EmptyGrid { .. }));
    }

    #[test]
    fn mask_in_place_zeroes_all_three_fields() {
        let fields = sample();
        let keep = array![[true, false], [true, false]];
        let mut out = fields.clone();
        out.mask_in_place(&keep);
        assert_eq!(out.thickness, array![[0.0, 0.0], [3.0, 0.0]]);
        assert_eq!(out.velocity_x, array![[1.0, 0.0], [-4.0, 0.0]]);
        assert_eq!(out.velocity_y, array![[1.0, 0.0], [0.0, 0.0]]);
    }

    #[test]
    fn pad_then_unpad_restores_interior() {
        let fields = sample();
        let padded = fields.pad(2).unwrap();
        assert_eq!(padded.dim(), (6, 6));
        assert_eq!(padded.thickness[[3, 2]], 3.0);
        assert_eq!(padded.thickness.row(0).sum(), 0.0);
        assert_eq!(padded.velocity_x.column(5).sum(), 0.0);
        assert_eq!(padded.unpad(2).unwrap(), fields);
    }

    #[test]
    fn unpad_wider_than_grid_fails() {
        assert!(sample().pad(1).unwrap().unpad(2).is_err());
    }

    #[test]
    fn pad_reports_overflowing_widths() {
        for width in [usize::MAX, usize::MAX / 2, usize::MAX / 4, 1 << 31] {
            let err = sample().pad(width).unwrap_err();
            assert_eq!(
                err,
                FloodFillError::PaddingTooWide {
                    width,
                    rows: 2,
                    cols: 2,
                }
            );
        }
    }

    #[test]
    fn summary_statistics() {
        let fields = sample();
        let grid = Grid::new(2, 2, 10.0, 20.0);
        assert_eq!(fields.ice_cell_count(), 2);
        assert_relative_eq!(fields.ice_volume(&grid), 5.0 * 200.0);
        assert_eq!(fields.max_thickness(), 3.0);
        let mag = fields.velocity_magnitude();
        assert_relative_eq!(mag[[0, 1]], 5.0);
        assert_relative_eq!(mag[[1, 0]], 4.0);
    }
}

//! Deterministic test geometry: a parabolic ice dome centred on the grid with
//! optional detached ice caps around it.

use crate::fields::IceFields;
use crate::grid::Grid;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Circular ice cap of uniform thickness, placed by cell index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceCap {
    pub row: usize,
    pub col: usize,
    pub radius: f64,    // meters
    pub thickness: f64, // meters
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub rows: usize,
    pub cols: usize,
    #[serde(default = "default_spacing")]
    pub dx: f64,
    #[serde(default = "default_spacing")]
    pub dy: f64,
    pub dome_radius: f64,    // meters
    pub dome_thickness: f64, // meters at the centre
    #[serde(default = "default_outflow_speed")]
    pub outflow_speed: f64, // m/yr at the dome margin
    #[serde(default)]
    pub ice_caps: Vec<IceCap>,
}

fn default_spacing() -> f64 {
    1000.0
}

fn default_outflow_speed() -> f64 {
    100.0
}

impl SyntheticConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(anyhow!(
                "Synthetic grid dimensions must be positive (rows={}, cols={})",
                self.rows,
                self.cols
            ));
        }
        if self.dx <= 0.0 || self.dy <= 0.0 {
            return Err(anyhow!(
                "Grid spacing must be positive (dx={}, dy={})",
                self.dx,
                self.dy
            ));
        }
        if self.dome_radius <= 0.0 || self.dome_thickness <= 0.0 {
            return Err(anyhow!(
                "Dome radius and thickness must be positive (radius={}, thickness={})",
                self.dome_radius,
                self.dome_thickness
            ));
        }
        for (idx, cap) in self.ice_caps.iter().enumerate() {
            if cap.row >= self.rows || cap.col >= self.cols {
                return Err(anyhow!(
                    "Ice cap {} at ({}, {}) is outside grid bounds ({}, {})",
                    idx,
                    cap.row,
                    cap.col,
                    self.rows,
                    self.cols
                ));
            }
            if cap.radius < 0.0 || cap.thickness <= 0.0 {
                return Err(anyhow!(
                    "Ice cap {} needs a non-negative radius and positive thickness (radius={}, thickness={})",
                    idx,
                    cap.radius,
                    cap.thickness
                ));
            }
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.rows, self.cols, self.dx, self.dy)
    }

    pub fn generate(&self) -> (Grid, IceFields) {
        let grid = self.grid();
        let mut fields = IceFields::zeros(grid.rows, grid.cols);
        let (seed_row, seed_col) = grid.seed();
        let xc = grid.x_coord(seed_col);
        let yc = grid.y_coord(seed_row);

        for ((row, col), thk) in fields.thickness.indexed_iter_mut() {
            let x = grid.x_coord(col) - xc;
            let y = grid.y_coord(row) - yc;
            let r = x.hypot(y) / self.dome_radius;
            if r < 1.0 {
                *thk = self.dome_thickness * (1.0 - r * r);
                // radial outflow, fastest at the margin
                fields.velocity_x[[row, col]] = self.outflow_speed * x / self.dome_radius;
                fields.velocity_y[[row, col]] = self.outflow_speed * y / self.dome_radius;
            }
        }

        for cap in &self.ice_caps {
            let cx = grid.x_coord(cap.col);
            let cy = grid.y_coord(cap.row);
            for ((row, col), thk) in fields.thickness.indexed_iter_mut() {
                let dist = (grid.x_coord(col) - cx).hypot(grid.y_coord(row) - cy);
                if dist <= cap.radius {
                    *thk = thk.max(cap.thickness);
                }
            }
        }

        (grid, fields)
    }
}

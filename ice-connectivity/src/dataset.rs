use crate::fields::IceFields;
use crate::grid::Grid;
use anyhow::{Context, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

fn default_spacing() -> f64 {
    1.0
}

/// Raw gridded ice dataset as stored on disk (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GriddedDataset {
    #[serde(default = "default_spacing")]
    pub dx: f64,
    #[serde(default = "default_spacing")]
    pub dy: f64,
    pub thickness: Array2<f64>,
    pub velocity_x: Array2<f64>,
    pub velocity_y: Array2<f64>,
}

impl GriddedDataset {
    pub fn from_fields(grid: &Grid, fields: IceFields) -> Self {
        GriddedDataset {
            dx: grid.dx,
            dy: grid.dy,
            thickness: fields.thickness,
            velocity_x: fields.velocity_x,
            velocity_y: fields.velocity_y,
        }
    }

    /// Split into grid geometry and validated fields.
    pub fn into_parts(self) -> Result<(Grid, IceFields)> {
        let (rows, cols) = self.thickness.dim();
        let grid = Grid::new(rows, cols, self.dx, self.dy);
        let fields = IceFields::new(self.thickness, self.velocity_x, self.velocity_y)
            .context("Dataset fields are inconsistent")?;
        Ok((grid, fields))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset '{}'", path.display()))?;
        let dataset: GriddedDataset = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse dataset '{}'", path.display()))?;
        Ok(dataset)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create dataset '{}'", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write dataset '{}'", path.display()))?;
        Ok(())
    }
}

use crate::config::{Config, VisualizationConfig};
use crate::dataset::GriddedDataset;
use crate::fields::IceFields;
use crate::flood_fill::{ConnectivityFilter, FilterStats};
use crate::grid::Grid;
use crate::visualisation::FieldVisualiser;
use anyhow::{Context, Result};
use log::{info, warn};
use ndarray::{s, Array2};
use std::path::PathBuf;
use std::time::Instant;

/// Summary of one trimming run.
#[derive(Debug, Clone)]
pub struct TrimReport {
    pub grid: Grid,
    pub stats: FilterStats,
    pub ice_cells_before: usize,
    pub ice_cells_after: usize,
    pub volume_before: f64,       // m^3
    pub volume_after: f64,        // m^3
    pub max_thickness_after: f64, // m
    pub max_speed_after: f64,     // same units as the input velocities
    pub plots: Vec<PathBuf>,
}

impl TrimReport {
    pub fn removed_volume_fraction(&self) -> f64 {
        if self.volume_before > 0.0 {
            1.0 - self.volume_after / self.volume_before
        } else {
            0.0
        }
    }
}

pub struct TrimJob {
    pub grid: Grid,
    pub fields: IceFields,
    pub filter: ConnectivityFilter,
    pub pad: usize,
    pub output: Option<PathBuf>,
    pub visualization: Option<VisualizationConfig>,
}

impl TrimJob {
    pub fn new(grid: Grid, fields: IceFields, filter: ConnectivityFilter) -> Self {
        Self {
            grid,
            fields,
            filter,
            pad: 0,
            output: None,
            visualization: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let (grid, fields) = match (&config.input.dataset, &config.input.synthetic) {
            (Some(path), _) => GriddedDataset::load(path)?.into_parts()?,
            (None, Some(synthetic)) => synthetic.generate(),
            (None, None) => anyhow::bail!("No input configured"),
        };
        Ok(Self {
            grid,
            fields,
            filter: ConnectivityFilter::with_boundary_policy(config.filter.boundary),
            pad: config.filter.pad,
            output: config.output.dataset.clone(),
            visualization: config.visualization.clone(),
        })
    }

    /// Filter the fields, write the outputs, and return the trimmed fields
    /// together with a report.
    pub fn run(self) -> Result<(IceFields, TrimReport)> {
        info!("Trimming disconnected ice...");
        info!(
            "Grid: {}x{} ({} x {} m)",
            self.grid.rows,
            self.grid.cols,
            self.grid.width(),
            self.grid.height()
        );

        let ice_cells_before = self.fields.ice_cell_count();
        let volume_before = self.fields.ice_volume(&self.grid);

        let start = Instant::now();
        let working = if self.pad > 0 {
            self.fields.pad(self.pad)?
        } else {
            self.fields.clone()
        };
        let outcome = self
            .filter
            .filter_owned(working)
            .context("Connectivity filter failed")?;
        let (trimmed, reachable) = if self.pad > 0 {
            let (rows, cols) = self.fields.dim();
            let interior = s![self.pad..self.pad + rows, self.pad..self.pad + cols];
            (
                outcome.fields.unpad(self.pad)?,
                outcome.reachable.slice(interior).to_owned(),
            )
        } else {
            (outcome.fields, outcome.reachable)
        };
        info!(
            "Flood fill: {} round(s), {} reachable cell(s), {} ice cell(s) removed in {:.3?}",
            outcome.stats.rounds,
            outcome.stats.reachable_cells,
            outcome.stats.removed_ice_cells,
            start.elapsed()
        );

        let report = TrimReport {
            grid: self.grid,
            stats: outcome.stats,
            ice_cells_before,
            ice_cells_after: trimmed.ice_cell_count(),
            volume_before,
            volume_after: trimmed.ice_volume(&self.grid),
            max_thickness_after: trimmed.max_thickness(),
            max_speed_after: trimmed.velocity_magnitude().fold(0.0_f64, |m, &v| m.max(v)),
            plots: Vec::new(),
        };
        info!(
            "Ice volume: {:.4e} -> {:.4e} m^3 ({:.2}% removed)",
            report.volume_before,
            report.volume_after,
            100.0 * report.removed_volume_fraction()
        );
        info!(
            "Remaining ice: max thickness {:.1} m, max speed {:.1}",
            report.max_thickness_after, report.max_speed_after
        );

        if let Some(path) = &self.output {
            GriddedDataset::from_fields(&self.grid, trimmed.clone()).save(path)?;
            info!("Trimmed dataset written to {}", path.display());
        }

        let plots = match &self.visualization {
            Some(vis) => Self::plot(vis, &self.fields, &trimmed, &reachable),
            None => Vec::new(),
        };

        Ok((trimmed, TrimReport { plots, ..report }))
    }

    fn plot(
        vis: &VisualizationConfig,
        before: &IceFields,
        after: &IceFields,
        reachable: &Array2<bool>,
    ) -> Vec<PathBuf> {
        let visualiser = match FieldVisualiser::new(&vis.output_dir, vis.image_width, vis.image_height)
        {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    "Failed to create plot directory '{}': {}",
                    vis.output_dir.display(),
                    e
                );
                return Vec::new();
            }
        };

        let mut plots = Vec::new();
        let results = [
            visualiser.plot_field(&before.thickness, "thickness_before", "Ice thickness (input)"),
            visualiser.plot_field(&after.thickness, "thickness_after", "Ice thickness (trimmed)"),
            visualiser.plot_mask(reachable, "reachable", "Connected to seed"),
        ];
        for result in results {
            match result {
                Ok(path) => plots.push(path),
                Err(e) => warn!("Failed to visualise: {}", e),
            }
        }
        plots
    }
}

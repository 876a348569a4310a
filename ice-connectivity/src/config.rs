use crate::flood_fill::BoundaryPolicy;
use crate::synthetic::SyntheticConfig;
use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the raw grids come from: a dataset file or a generated dome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthetic: Option<SyntheticConfig>,
}

impl InputConfig {
    fn validate(&self) -> Result<()> {
        match (&self.dataset, &self.synthetic) {
            (Some(_), Some(_)) => Err(anyhow!(
                "Input must be either a dataset or a synthetic grid, not both"
            )),
            (None, None) => Err(anyhow!("No input given: set input.dataset or [input.synthetic]")),
            (None, Some(synthetic)) => synthetic.validate(),
            (Some(_), None) => Ok(()),
        }
    }
}

/// Flood-fill settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub boundary: BoundaryPolicy,
    #[serde(default)]
    pub pad: usize, // Non-ice border added before filtering, removed afterwards
}

/// Widest border `pad` accepts, in cells.
pub const MAX_PAD: usize = 4096;

impl FilterConfig {
    fn validate(&self) -> Result<()> {
        if self.pad > MAX_PAD {
            return Err(anyhow!(
                "filter.pad must be at most {} cells, got {}",
                MAX_PAD,
                self.pad
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationConfig {
    #[serde(default = "default_plot_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
}

fn default_plot_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_image_width() -> u32 {
    1000
}

fn default_image_height() -> u32 {
    1000
}

impl VisualizationConfig {
    pub fn new(output_dir: PathBuf) -> Self {
        VisualizationConfig {
            output_dir,
            image_width: default_image_width(),
            image_height: default_image_height(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(anyhow!(
                "Image dimensions must be positive (width={}, height={})",
                self.image_width,
                self.image_height
            ));
        }
        Ok(())
    }
}

/// Complete trimming run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<VisualizationConfig>,
}

impl Config {
    /// Load configuration from TOML file. The result is not validated yet so
    /// that command-line overrides can be applied first; call
    /// [`Config::validate`] afterwards.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| anyhow!("Failed to parse TOML config: {}", e))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.input.validate()?;
        self.filter.validate()?;
        if let Some(vis) = &self.visualization {
            vis.validate()?;
        }
        if self.output.dataset.is_none() && self.visualization.is_none() {
            warn!("No output dataset or visualization configured; results are only logged");
        }
        Ok(())
    }

    pub fn print_summary(&self) {
        info!("=== Trim Configuration ===");
        match (&self.input.dataset, &self.input.synthetic) {
            (Some(path), _) => info!("Input: dataset {}", path.display()),
            (None, Some(s)) => info!(
                "Input: synthetic {}x{} dome (radius={} m, thickness={} m, {} ice cap(s))",
                s.rows,
                s.cols,
                s.dome_radius,
                s.dome_thickness,
                s.ice_caps.len()
            ),
            (None, None) => info!("Input: none"),
        }
        info!(
            "Filter: boundary={:?}, pad={} cell(s)",
            self.filter.boundary, self.filter.pad
        );
        if let Some(path) = &self.output.dataset {
            info!("Output: {}", path.display());
        }
        if let Some(vis) = &self.visualization {
            info!(
                "Visualization: {}x{} into {}",
                vis.image_width,
                vis.image_height,
                vis.output_dir.display()
            );
        }
        info!("==========================");
    }
}

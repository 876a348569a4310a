use ndarray::Array2;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

pub struct FieldVisualiser {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    gradient: Box<dyn colorgrad::Gradient>,
}

impl FieldVisualiser {
    pub fn new(output_dir: &Path, width: u32, height: u32) -> std::io::Result<Self> {
        std::fs::create_dir_all(output_dir)?;

        // Ice reads naturally as white-to-blue
        let gradient = Box::new(colorgrad::preset::blues());

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            width,
            height,
            gradient,
        })
    }

    /// Render a non-negative field such as thickness, scaled to its maximum.
    /// Returns the path of the written PNG.
    pub fn plot_field(
        &self,
        data: &Array2<f64>,
        name: &str,
        title: &str,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let max_val = data.iter().copied().fold(0.0_f64, f64::max);
        self.draw_cells(data.dim(), name, title, |row, col| {
            self.value_to_color(data[[row, col]], max_val)
        })
    }

    /// Render the reachable set: kept cells dark, removed cells light.
    pub fn plot_mask(
        &self,
        mask: &Array2<bool>,
        name: &str,
        title: &str,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        self.draw_cells(mask.dim(), name, title, |row, col| {
            self.value_to_color(if mask[[row, col]] { 1.0 } else { 0.0 }, 1.0)
        })
    }

    fn draw_cells<F>(
        &self,
        (rows, cols): (usize, usize),
        name: &str,
        title: &str,
        color_at: F,
    ) -> Result<PathBuf, Box<dyn std::error::Error>>
    where
        F: Fn(usize, usize) -> RGBColor,
    {
        let filename = self.output_dir.join(format!("{}.png", name));
        // the backend borrows the path until it is dropped
        {
            let root = BitMapBackend::new(&filename, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 30))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(40)
                .build_cartesian_2d(0..cols, 0..rows)?;

            chart
                .configure_mesh()
                .x_desc("Column")
                .y_desc("Row")
                .draw()?;

            chart.draw_series((0..rows).flat_map(|row| {
                let color_at = &color_at;
                (0..cols).map(move |col| {
                    Rectangle::new([(col, row), (col + 1, row + 1)], color_at(row, col).filled())
                })
            }))?;

            root.present()?;
        }
        log::info!("Saved plot: {}", filename.display());
        Ok(filename)
    }

    fn value_to_color(&self, value: f64, max_val: f64) -> RGBColor {
        let rgba = self.gradient.at(normalize(value, max_val) as f32).to_rgba8();
        RGBColor(rgba[0], rgba[1], rgba[2])
    }
}

/// Map `value` into [0, 1] relative to `max_val`. A flat field maps to 0.
fn normalize(value: f64, max_val: f64) -> f64 {
    if max_val > 0.0 {
        (value / max_val).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

use anyhow::Result;
use clap::{Parser, ValueEnum};
use ice_connectivity::config::{Config, VisualizationConfig};
use ice_connectivity::pipeline::TrimJob;
use ice_connectivity::BoundaryPolicy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ice-trim", version, about = "Remove ice not connected to the main ice sheet")]
struct Cli {
    /// TOML run configuration
    #[arg(long, short, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Input dataset (JSON); overrides input.dataset
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Where to write the trimmed dataset; overrides output.dataset
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Behaviour when connected ice touches the grid edge
    #[arg(long, value_enum)]
    boundary: Option<CliBoundary>,

    /// Non-ice border width added before filtering
    #[arg(long)]
    pad: Option<usize>,

    /// Write PNG plots into this directory
    #[arg(long, value_name = "DIR")]
    plot_dir: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CliBoundary {
    Reject,
    Clip,
}

impl From<CliBoundary> for BoundaryPolicy {
    fn from(b: CliBoundary) -> Self {
        match b {
            CliBoundary::Reject => BoundaryPolicy::Reject,
            CliBoundary::Clip => BoundaryPolicy::Clip,
        }
    }
}

fn resolve_config(cli: Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(input) = cli.input {
        config.input.dataset = Some(input);
        config.input.synthetic = None;
    }
    if let Some(output) = cli.output {
        config.output.dataset = Some(output);
    }
    if let Some(boundary) = cli.boundary {
        config.filter.boundary = boundary.into();
    }
    if let Some(pad) = cli.pad {
        config.filter.pad = pad;
    }
    if let Some(dir) = cli.plot_dir {
        match config.visualization.as_mut() {
            Some(vis) => vis.output_dir = dir,
            None => config.visualization = Some(VisualizationConfig::new(dir)),
        }
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = resolve_config(cli)?;
    config.print_summary();

    let (_, report) = TrimJob::from_config(&config)?.run()?;
    println!(
        "Kept {} of {} ice cells ({:.2}% of volume removed)",
        report.ice_cells_after,
        report.ice_cells_before,
        100.0 * report.removed_volume_fraction()
    );
    Ok(())
}

//! Contour heightmap builder.
//!
//! Rasterizes a JSON file of contour line strips into:
//! - an elevation grid of little-endian `f64` values, row 0 along `min_y`
//! - an optional line-art mask of `0`/`1` bytes
//!
//! A JSON summary of the run is printed to stdout; logs go to stderr.

mod config;
mod pipeline;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use contour_raster::{BoundingBox, RasterArea};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::Overrides;
use pipeline::Job;

#[derive(Parser, Debug)]
#[command(name = "heightmap-builder")]
#[command(about = "Rasterize contour lines into an interpolated heightmap")]
struct Args {
    /// JSON file holding an array of line strips
    input: PathBuf,

    /// Output file for the elevation grid
    #[arg(short, long, default_value = "heightmap.f64")]
    output: PathBuf,

    /// Output file for the line mask (skipped when absent)
    #[arg(long)]
    mask_output: Option<PathBuf>,

    /// Raster width in pixels
    #[arg(long, default_value = "512")]
    width: usize,

    /// Raster height in pixels
    #[arg(long, default_value = "512")]
    height: usize,

    /// Area to rasterize as "minx,miny,maxx,maxy" (default: the whole extent)
    #[arg(long)]
    bbox: Option<String>,

    /// World x bound used for normalization (default: derived from data)
    #[arg(long)]
    x_max: Option<f64>,

    /// World y bound used for normalization (default: derived from data)
    #[arg(long)]
    y_max: Option<f64>,

    /// Exclude a bucket grid cell, given as "cx,cy" (repeatable)
    #[arg(long = "exclude", value_parser = pipeline::parse_cell)]
    excluded: Vec<(usize, usize)>,

    /// YAML file with raster settings (default: CONTOUR_* environment)
    #[arg(long, env = "CONTOUR_CONFIG")]
    config: Option<PathBuf>,

    /// Bucket grid cells per side
    #[arg(long)]
    grid_size: Option<usize>,

    /// Extra rings searched after the first hit
    #[arg(long)]
    overrun_rings: Option<usize>,

    /// Number of column ranges rasterized in parallel
    #[arg(long)]
    column_splits: Option<usize>,

    /// Line mask width in pixel pitches
    #[arg(long)]
    line_wiggle: Option<f64>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!(input = %args.input.display(), "Starting heightmap build");

    let overrides = Overrides {
        grid_size: args.grid_size,
        overrun_rings: args.overrun_rings,
        column_splits: args.column_splits,
        line_wiggle: args.line_wiggle,
    };
    let config = config::resolve(args.config.as_deref(), &overrides)?;

    let strips = pipeline::load_strips(&args.input)?;
    let extent = pipeline::resolve_extent(&strips, args.x_max, args.y_max)?;

    let bbox = match &args.bbox {
        Some(s) => BoundingBox::parse(s)?,
        None => BoundingBox::from(extent),
    };
    let area = RasterArea::new(bbox, args.width, args.height).context("Invalid raster area")?;

    let job = Job {
        strips,
        extent,
        area,
        excluded: args.excluded,
        config,
        line_mask: args.mask_output.is_some(),
    };
    let output = pipeline::run(&job)?;

    pipeline::write_heights(&args.output, &output.heights)?;
    info!(path = %args.output.display(), "Wrote elevation grid");

    if let (Some(path), Some(mask)) = (&args.mask_output, &output.mask) {
        pipeline::write_mask(path, mask)?;
        info!(path = %path.display(), "Wrote line mask");
    }

    println!("{}", serde_json::to_string_pretty(&output.report)?);
    Ok(())
}

//! Load strips, rasterize, and write the output files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use contour_raster::{
    validate_strips, BoundingBox, CellMask, Extent, IndexStats, LineStrip, RasterArea,
    RasterConfig, RasterSummary, Rasterizer, SpatialIndex,
};
use serde::Serialize;
use tracing::{info, warn};

/// Everything needed for one rasterization run.
#[derive(Debug, Clone)]
pub struct Job {
    pub strips: Vec<LineStrip>,
    pub extent: Extent,
    pub area: RasterArea,
    pub excluded: Vec<(usize, usize)>,
    pub config: RasterConfig,
    pub line_mask: bool,
}

/// Rasters produced by a run.
#[derive(Debug)]
pub struct Output {
    pub heights: Vec<f64>,
    pub mask: Option<Vec<bool>>,
    pub report: BuildReport,
}

/// JSON summary printed after a run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub width: usize,
    pub height: usize,
    pub bbox: BoundingBox,
    pub extent: Extent,
    pub strips: usize,
    pub excluded_cells: usize,
    pub index: IndexStats,
    pub summary: RasterSummary,
    pub line_pixels: Option<usize>,
    pub elapsed_ms: u64,
}

/// Read and validate a JSON array of line strips.
pub fn load_strips(path: &Path) -> Result<Vec<LineStrip>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open strips file: {}", path.display()))?;

    let strips: Vec<LineStrip> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse strips file: {}", path.display()))?;

    validate_strips(&strips)
        .with_context(|| format!("Invalid strips in {}", path.display()))?;

    info!(path = %path.display(), strips = strips.len(), "Loaded contour strips");
    Ok(strips)
}

/// Parse a `cx,cy` cell coordinate.
pub fn parse_cell(s: &str) -> std::result::Result<(usize, usize), String> {
    let (cx, cy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'cx,cy', got '{}'", s))?;
    let cx = cx.trim().parse().map_err(|_| format!("invalid cell x in '{}'", s))?;
    let cy = cy.trim().parse().map_err(|_| format!("invalid cell y in '{}'", s))?;
    Ok((cx, cy))
}

/// Build the index, apply exclusions and rasterize.
pub fn run(job: &Job) -> Result<Output> {
    let start = Instant::now();
    let size = job.config.grid_size;

    let outside = job.excluded.iter().filter(|&&(cx, cy)| cx >= size || cy >= size).count();
    if outside > 0 {
        warn!(outside, grid_size = size, "Ignoring excluded cells outside the grid");
    }
    let cells = CellMask::from_cells(size, job.excluded.iter().copied());

    let index = SpatialIndex::from_config(&job.strips, job.extent, &job.config);
    let raster = Rasterizer::new(&index, &cells, job.config.clone())?;

    let (heights, summary) = raster.rasterize_to_vec(&job.area)?;

    let (mask, line_pixels) = if job.line_mask {
        let mut mask = vec![false; job.area.len()];
        let hits = raster.rasterize_line_mask(&job.area, &mut mask)?;
        (Some(mask), Some(hits))
    } else {
        (None, None)
    };

    let report = BuildReport {
        width: job.area.width,
        height: job.area.height,
        bbox: job.area.bbox,
        extent: job.extent,
        strips: job.strips.len(),
        excluded_cells: cells.excluded_count(),
        index: index.stats(),
        summary,
        line_pixels,
        elapsed_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        width = report.width,
        height = report.height,
        no_data_pixels = summary.no_data_pixels,
        elapsed_ms = report.elapsed_ms,
        "Heightmap complete"
    );

    Ok(Output {
        heights,
        mask,
        report,
    })
}

/// Write heights as consecutive little-endian `f64` values, row 0 first.
pub fn write_heights(path: &Path, heights: &[f64]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for h in heights {
        writer.write_all(&h.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a line mask as one byte per pixel, `1` on a line and `0` elsewhere.
pub fn write_mask(path: &Path, mask: &[bool]) -> Result<()> {
    let bytes: Vec<u8> = mask.iter().map(|&m| u8::from(m)).collect();
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write mask file: {}", path.display()))
}

/// Resolve the world extent: explicit bounds win, otherwise derived from
/// the data.
pub fn resolve_extent(strips: &[LineStrip], x_max: Option<f64>, y_max: Option<f64>) -> Result<Extent> {
    match (x_max, y_max) {
        (Some(x), Some(y)) => Ok(Extent::new(x, y)?),
        (None, None) => Extent::from_strips(strips).context("Cannot derive extent from strips"),
        _ => bail!("--x-max and --y-max must be given together"),
    }
}

//! Nearest-contour search and parallel rasterization.

use crate::columns::{column_ranges, map_column_blocks};
use crate::config::RasterConfig;
use crate::error::{RasterError, Result};
use crate::geometry::{max_ring_radius, point_segment_distance_sq, RingCells};
use crate::mask::{ExclusionMask, NoExclusion};
use crate::ranker::ContourRanker;
use crate::spatial_index::SpatialIndex;
use crate::types::{Point, RasterArea};
use crate::NO_DATA;
use serde::Serialize;
use std::time::Instant;

/// Smallest and largest elevation written to a raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElevationRange {
    pub min: f64,
    pub max: f64,
}

/// Result of an elevation rasterization pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RasterSummary {
    /// Range over every pixel that is not [`NO_DATA`]; `None` if there are none.
    pub range: Option<ElevationRange>,
    /// Pixels written as [`NO_DATA`].
    pub no_data_pixels: usize,
    /// Total pixels written.
    pub pixels: usize,
}

/// Per-block min/max accumulator, merged after all blocks finish.
#[derive(Debug, Clone, Copy)]
struct RangeAccumulator {
    min: f64,
    max: f64,
    no_data: usize,
    pixels: usize,
}

impl Default for RangeAccumulator {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            no_data: 0,
            pixels: 0,
        }
    }
}

impl RangeAccumulator {
    #[inline]
    fn push(&mut self, value: f64) {
        self.pixels += 1;
        if value == NO_DATA {
            self.no_data += 1;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            no_data: self.no_data + other.no_data,
            pixels: self.pixels + other.pixels,
        }
    }

    fn finish(self) -> RasterSummary {
        let range = (self.pixels > self.no_data).then_some(ElevationRange {
            min: self.min,
            max: self.max,
        });
        RasterSummary {
            range,
            no_data_pixels: self.no_data,
            pixels: self.pixels,
        }
    }
}

/// Interpolates elevations from a [`SpatialIndex`] of contour segments.
///
/// The rasterizer only borrows the index and the exclusion mask, so the
/// mask cannot change while any query or rasterization pass is running.
#[derive(Debug)]
pub struct Rasterizer<'a, M: ExclusionMask = NoExclusion> {
    index: &'a SpatialIndex<'a>,
    mask: &'a M,
    config: RasterConfig,
}

impl<'a> Rasterizer<'a, NoExclusion> {
    /// A rasterizer that excludes nothing.
    pub fn unmasked(index: &'a SpatialIndex<'a>, config: RasterConfig) -> Result<Self> {
        Self::new(index, &NoExclusion, config)
    }
}

impl<'a, M: ExclusionMask> Rasterizer<'a, M> {
    /// Create a rasterizer after validating the configuration.
    ///
    /// The config's grid size and alignment must match the index, since
    /// masks are addressed in the index's cells.
    pub fn new(index: &'a SpatialIndex<'a>, mask: &'a M, config: RasterConfig) -> Result<Self> {
        config.validate()?;
        if config.grid_size != index.size() {
            return Err(RasterError::config(format!(
                "grid_size {} does not match index grid size {}",
                config.grid_size,
                index.size()
            )));
        }
        if config.grid_alignment != index.alignment() {
            return Err(RasterError::config(format!(
                "grid_alignment {:?} does not match index alignment {:?}",
                config.grid_alignment,
                index.alignment()
            )));
        }
        Ok(Self { index, mask, config })
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    pub fn index(&self) -> &SpatialIndex<'a> {
        self.index
    }

    /// Interpolated elevation at a world-space point.
    ///
    /// Returns [`NO_DATA`] when the point's cell is excluded or no segment is
    /// reachable. A segment closer than `exact_hit_epsilon` returns its own
    /// elevation immediately. Otherwise rings of cells around the point are
    /// searched outward until two distinct contour levels are ranked or
    /// `overrun_rings` rings have passed since the first candidate.
    pub fn find_elevation(&self, p: &Point) -> f64 {
        let index = self.index;
        let size = index.size();
        let home = index.cell_of(p);
        if self.mask.is_cell_excluded(home) {
            return NO_DATA;
        }

        let mut ranker = ContourRanker::new();
        let mut first_hit_ring: Option<usize> = None;

        for radius in 0..=max_ring_radius(home, size) {
            for cell in RingCells::new(home, radius, size) {
                if self.mask.is_cell_excluded(cell) {
                    continue;
                }
                for &seg in index.segments_in(cell) {
                    let strip = index.strip(seg);
                    let (a, b) = index.endpoints(seg);
                    let distance_sq = point_segment_distance_sq(p, a, b);
                    if distance_sq < self.config.exact_hit_epsilon {
                        return strip.elevation;
                    }
                    ranker.add_candidate(distance_sq, strip.elevation_id, strip.elevation);
                }
            }

            if ranker.is_empty() {
                continue;
            }
            let first = *first_hit_ring.get_or_insert(radius);
            if ranker.has_sufficient_data() || radius >= first + self.config.overrun_rings {
                break;
            }
        }

        ranker.weighted_elevation()
    }

    /// Whether any segment in the point's own cell lies closer than
    /// `sqrt(threshold_sq)`. Excluded cells never match.
    pub fn is_near_line(&self, p: &Point, threshold_sq: f64) -> bool {
        let cell = self.index.cell_of(p);
        if self.mask.is_cell_excluded(cell) {
            return false;
        }
        self.index.segments_in(cell).iter().any(|&seg| {
            let (a, b) = self.index.endpoints(seg);
            point_segment_distance_sq(p, a, b) < threshold_sq
        })
    }

    /// Fill `out` with interpolated elevations for every pixel of `area`.
    ///
    /// Columns are split into `column_splits` ranges computed in parallel;
    /// the split factor never changes any pixel or the returned range.
    pub fn rasterize(&self, area: &RasterArea, out: &mut [f64]) -> Result<RasterSummary> {
        check_buffer(area, out.len())?;
        let start = Instant::now();

        let partials = map_column_blocks(out, area.width, self.config.column_splits, |cols, rows| {
            let mut acc = RangeAccumulator::default();
            for (row, line) in rows.into_iter().enumerate() {
                for (value, col) in line.iter_mut().zip(cols.clone()) {
                    *value = self.find_elevation(&area.pixel_center(col, row));
                    acc.push(*value);
                }
            }
            tracing::trace!(
                first_col = cols.start,
                last_col = cols.end,
                no_data = acc.no_data,
                "Rasterized column block"
            );
            acc
        });

        let blocks = partials.len();
        let summary = partials
            .into_iter()
            .fold(RangeAccumulator::default(), RangeAccumulator::merge)
            .finish();

        tracing::debug!(
            width = area.width,
            height = area.height,
            blocks,
            no_data_pixels = summary.no_data_pixels,
            min = summary.range.map(|r| r.min),
            max = summary.range.map(|r| r.max),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rasterized elevation grid"
        );

        Ok(summary)
    }

    /// Allocate a buffer, rasterize into it and return both.
    pub fn rasterize_to_vec(&self, area: &RasterArea) -> Result<(Vec<f64>, RasterSummary)> {
        let mut out = vec![NO_DATA; area.len()];
        let summary = self.rasterize(area, &mut out)?;
        Ok((out, summary))
    }

    /// Fill `out` with a line-art mask: true where a contour passes within
    /// `line_mask_wiggle` pixel pitches of the pixel centre.
    ///
    /// Only the pixel's own cell is inspected. Returns the number of pixels
    /// set.
    pub fn rasterize_line_mask(&self, area: &RasterArea, out: &mut [bool]) -> Result<usize> {
        check_buffer(area, out.len())?;
        let start = Instant::now();

        let wiggle = self.config.line_mask_wiggle * area.pixel_pitch();
        let threshold_sq = wiggle * wiggle;

        let hits: usize = map_column_blocks(out, area.width, self.config.column_splits, |cols, rows| {
            let mut hits = 0;
            for (row, line) in rows.into_iter().enumerate() {
                for (value, col) in line.iter_mut().zip(cols.clone()) {
                    *value = self.is_near_line(&area.pixel_center(col, row), threshold_sq);
                    hits += usize::from(*value);
                }
            }
            hits
        })
        .into_iter()
        .sum();

        tracing::debug!(
            width = area.width,
            height = area.height,
            blocks = column_ranges(area.width, self.config.column_splits).len(),
            hits,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rasterized line mask"
        );

        Ok(hits)
    }
}

fn check_buffer(area: &RasterArea, actual: usize) -> Result<()> {
    let expected = area.len();
    if expected == 0 {
        return Err(RasterError::invalid_area("raster has no pixels"));
    }
    if actual != expected {
        return Err(RasterError::BufferSize { expected, actual });
    }
    Ok(())
}

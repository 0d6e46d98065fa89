//! Uniform bucket grid over line strip segments.
//!
//! Each segment is registered under the cell of each of its two endpoints
//! (once when both land in the same cell). The index borrows the strips it
//! was built from and is immutable afterwards, so any number of threads can
//! query it through a shared reference.

use crate::config::{RasterConfig, MAX_GRID_SIZE};
use crate::types::{CellCoord, Extent, LineStrip, Point};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Offset added to normalized coordinates before they are bucketed.
///
/// Shifting the grid lets adjacent tiles of a larger job share cell
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridAlignment {
    pub offset_x: f64,
    pub offset_y: f64,
}

impl GridAlignment {
    pub fn new(offset_x: f64, offset_y: f64) -> Self {
        Self { offset_x, offset_y }
    }
}

/// Reference to the segment `points[point] → points[point + 1]` of
/// `strips[strip]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentRef {
    pub strip: u32,
    pub point: u32,
}

/// Summary of how segments are spread across the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IndexStats {
    /// Segments indexed, counting each once.
    pub segments: usize,
    /// Total cell registrations (1 or 2 per segment).
    pub registrations: usize,
    /// Cells holding at least one segment.
    pub occupied_cells: usize,
    /// Largest number of segments in a single cell.
    pub max_cell_load: usize,
}

/// Grid side actually allocated for a requested size.
fn clamp_grid_size(grid_size: usize) -> usize {
    grid_size.clamp(1, MAX_GRID_SIZE)
}

/// Bucket grid over the segments of a borrowed line strip collection.
#[derive(Debug)]
pub struct SpatialIndex<'a> {
    strips: &'a [LineStrip],
    extent: Extent,
    alignment: GridAlignment,
    size: usize,
    cells: Vec<Vec<SegmentRef>>,
}

impl<'a> SpatialIndex<'a> {
    /// Build the index.
    ///
    /// `grid_size` is clamped to `1..=MAX_GRID_SIZE`, the range accepted by
    /// [`RasterConfig::validate`]. Strips with fewer than two points
    /// contribute no segments.
    pub fn build(
        strips: &'a [LineStrip],
        extent: Extent,
        grid_size: usize,
        alignment: GridAlignment,
    ) -> Self {
        let start = Instant::now();
        let size = clamp_grid_size(grid_size);
        let mut index = Self {
            strips,
            extent,
            alignment,
            size,
            cells: vec![Vec::new(); size * size],
        };

        for (strip_idx, strip) in strips.iter().enumerate() {
            for (point_idx, pair) in strip.points.windows(2).enumerate() {
                let seg = SegmentRef {
                    strip: strip_idx as u32,
                    point: point_idx as u32,
                };
                let c0 = index.cell_of(&pair[0]);
                let c1 = index.cell_of(&pair[1]);

                index.push(c0, seg);
                if c1 != c0 {
                    index.push(c1, seg);
                }
            }
        }

        let stats = index.stats();
        tracing::debug!(
            strips = strips.len(),
            segments = stats.segments,
            occupied_cells = stats.occupied_cells,
            max_cell_load = stats.max_cell_load,
            grid_size = size,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Built contour spatial index"
        );

        index
    }

    /// Build with the grid size and alignment taken from a config.
    pub fn from_config(strips: &'a [LineStrip], extent: Extent, config: &RasterConfig) -> Self {
        Self::build(strips, extent, config.grid_size, config.grid_alignment)
    }

    fn push(&mut self, cell: CellCoord, seg: SegmentRef) {
        let idx = self.slot(cell);
        self.cells[idx].push(seg);
    }

    #[inline]
    fn slot(&self, cell: CellCoord) -> usize {
        cell.cy * self.size + cell.cx
    }

    /// Cell containing a world-space point, clamped into the grid.
    #[inline]
    pub fn cell_of(&self, p: &Point) -> CellCoord {
        let (nx, ny) = self.extent.normalize(p);
        CellCoord::new(
            self.scale(nx + self.alignment.offset_x),
            self.scale(ny + self.alignment.offset_y),
        )
    }

    #[inline]
    fn scale(&self, normalized: f64) -> usize {
        let scaled = (normalized * self.size as f64).floor();
        if scaled <= 0.0 || scaled.is_nan() {
            0
        } else {
            (scaled as usize).min(self.size - 1)
        }
    }

    /// Number of segments registered in a cell.
    #[inline]
    pub fn cell_len(&self, cell: CellCoord) -> usize {
        self.segments_in(cell).len()
    }

    /// The `i`-th segment registered in a cell.
    #[inline]
    pub fn segment_at(&self, cell: CellCoord, i: usize) -> SegmentRef {
        self.segments_in(cell)[i]
    }

    /// All segments registered in a cell.
    #[inline]
    pub fn segments_in(&self, cell: CellCoord) -> &[SegmentRef] {
        &self.cells[self.slot(cell)]
    }

    /// The strip a segment belongs to.
    #[inline]
    pub fn strip(&self, seg: SegmentRef) -> &'a LineStrip {
        &self.strips[seg.strip as usize]
    }

    /// Endpoints of a segment.
    #[inline]
    pub fn endpoints(&self, seg: SegmentRef) -> (&'a Point, &'a Point) {
        let points = &self.strip(seg).points;
        let i = seg.point as usize;
        (&points[i], &points[i + 1])
    }

    /// Cells per side.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn alignment(&self) -> GridAlignment {
        self.alignment
    }

    /// The strip collection the index refers to.
    pub fn strips(&self) -> &'a [LineStrip] {
        self.strips
    }

    /// Segment distribution statistics.
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            segments: self.strips.iter().map(LineStrip::segment_count).sum(),
            ..IndexStats::default()
        };
        for cell in &self.cells {
            stats.registrations += cell.len();
            if !cell.is_empty() {
                stats.occupied_cells += 1;
                stats.max_cell_load = stats.max_cell_load.max(cell.len());
            }
        }
        stats
    }
}

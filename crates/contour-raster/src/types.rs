//! Core geometry and raster types.

use crate::error::{RasterError, Result};
use serde::{Deserialize, Serialize};

/// A point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to another point.
    #[inline]
    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A contour polyline at a single elevation.
///
/// Several strips may share one `elevation_id`; the ranker treats them as
/// the same contour level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStrip {
    pub elevation_id: i32,
    pub elevation: f64,
    pub points: Vec<Point>,
}

impl LineStrip {
    /// Create a strip, rejecting fewer than two points or non-finite values.
    pub fn new(elevation_id: i32, elevation: f64, points: Vec<Point>) -> Result<Self> {
        let strip = Self {
            elevation_id,
            elevation,
            points,
        };
        strip.check(0)?;
        Ok(strip)
    }

    /// Number of segments in the strip.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    fn check(&self, index: usize) -> Result<()> {
        if self.points.len() < 2 {
            return Err(RasterError::DegenerateStrip {
                index,
                elevation_id: self.elevation_id,
                points: self.points.len(),
            });
        }
        if !self.elevation.is_finite() || !self.points.iter().all(Point::is_finite) {
            return Err(RasterError::NonFinite { index });
        }
        Ok(())
    }
}

/// Check every strip of a deserialized collection.
///
/// Reports the first offending strip by its position in the slice.
pub fn validate_strips(strips: &[LineStrip]) -> Result<()> {
    strips
        .iter()
        .enumerate()
        .try_for_each(|(index, strip)| strip.check(index))
}

/// World-space bounds used to normalize coordinates into `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub x_max: f64,
    pub y_max: f64,
}

impl Extent {
    /// Create an extent, rejecting non-positive or non-finite bounds.
    pub fn new(x_max: f64, y_max: f64) -> Result<Self> {
        if !(x_max.is_finite() && y_max.is_finite() && x_max > 0.0 && y_max > 0.0) {
            return Err(RasterError::InvalidExtent { x_max, y_max });
        }
        Ok(Self { x_max, y_max })
    }

    /// Derive the extent from the largest coordinates present in the data.
    pub fn from_strips(strips: &[LineStrip]) -> Result<Self> {
        let (x_max, y_max) = strips
            .iter()
            .flat_map(|s| s.points.iter())
            .fold((0.0f64, 0.0f64), |(mx, my), p| (mx.max(p.x), my.max(p.y)));
        Self::new(x_max, y_max)
    }

    /// Map a world point into normalized space.
    #[inline]
    pub fn normalize(&self, p: &Point) -> (f64, f64) {
        (p.x / self.x_max, p.y / self.y_max)
    }
}

/// Integer coordinate of a bucket grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub cx: usize,
    pub cy: usize,
}

impl CellCoord {
    pub const fn new(cx: usize, cy: usize) -> Self {
        Self { cx, cy }
    }
}

/// An axis-aligned bounding box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse a `"minx,miny,maxx,maxy"` string.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| RasterError::BboxParse(s.to_string()))?;

        match parts.as_slice() {
            [min_x, min_y, max_x, max_y] => Ok(Self::new(*min_x, *min_y, *max_x, *max_y)),
            _ => Err(RasterError::BboxParse(s.to_string())),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl From<Extent> for BoundingBox {
    fn from(extent: Extent) -> Self {
        Self::new(0.0, 0.0, extent.x_max, extent.y_max)
    }
}

/// A world-space region sampled onto a `width × height` pixel raster.
///
/// Row 0 lies along `min_y`; pixels are sampled at their centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterArea {
    pub bbox: BoundingBox,
    pub width: usize,
    pub height: usize,
}

impl RasterArea {
    /// Create a raster area, rejecting empty dimensions or an inverted box.
    pub fn new(bbox: BoundingBox, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::invalid_area(format!(
                "dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        let finite = [bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Err(RasterError::invalid_area(format!("degenerate bbox {:?}", bbox)));
        }
        Ok(Self { bbox, width, height })
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// World size of one pixel along (x, y).
    pub fn pixel_size(&self) -> (f64, f64) {
        (
            self.bbox.width() / self.width as f64,
            self.bbox.height() / self.height as f64,
        )
    }

    /// The larger of the two pixel dimensions.
    pub fn pixel_pitch(&self) -> f64 {
        let (dx, dy) = self.pixel_size();
        dx.max(dy)
    }

    /// World coordinate of a pixel centre.
    #[inline]
    pub fn pixel_center(&self, col: usize, row: usize) -> Point {
        let (dx, dy) = self.pixel_size();
        Point::new(
            self.bbox.min_x + (col as f64 + 0.5) * dx,
            self.bbox.min_y + (row as f64 + 0.5) * dy,
        )
    }
}

//! Contour-to-heightmap rasterization.
//!
//! Turns a collection of elevation contour polylines into a dense raster of
//! interpolated heights, plus a companion boolean line-art raster.
//!
//! # Architecture
//!
//! ```text
//! &[LineStrip]
//!      │
//!      ▼
//! SpatialIndex::build()          bucket grid, segments registered by endpoint
//!      │
//!      ▼
//! Rasterizer::rasterize(area)
//!      │
//!      ├─► split columns into ranges, one parallel task each
//!      │
//!      └─► per pixel: find_elevation()
//!               │
//!               ├─► excluded cell?         → NO_DATA
//!               ├─► ring search of cells   → segment distances
//!               ├─► exact hit?             → that contour's elevation
//!               └─► ContourRanker          → inverse-distance weighted elevation
//! ```
//!
//! # Example
//!
//! ```
//! use contour_raster::{
//!     BoundingBox, Extent, LineStrip, Point, RasterArea, RasterConfig, Rasterizer, SpatialIndex,
//! };
//!
//! let strips = vec![
//!     LineStrip::new(1, 0.0, vec![Point::new(0.0, 0.25), Point::new(1.0, 0.25)])?,
//!     LineStrip::new(2, 100.0, vec![Point::new(0.0, 0.75), Point::new(1.0, 0.75)])?,
//! ];
//! let config = RasterConfig::default().with_grid_size(8);
//! let index = SpatialIndex::from_config(&strips, Extent::new(1.0, 1.0)?, &config);
//! let rasterizer = Rasterizer::unmasked(&index, config)?;
//!
//! let area = RasterArea::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 32, 32)?;
//! let (heights, summary) = rasterizer.rasterize_to_vec(&area)?;
//! assert_eq!(heights.len(), 32 * 32);
//! assert!(summary.range.is_some());
//! # Ok::<(), contour_raster::RasterError>(())
//! ```

pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod ranker;
pub mod spatial_index;
pub mod types;

/// Elevation written for excluded pixels and pixels with no reachable data.
///
/// Never included in a [`RasterSummary`]'s range.
pub const NO_DATA: f64 = 2e8;

// Re-export commonly used types at crate root
pub use config::RasterConfig;
pub use engine::{ElevationRange, RasterSummary, Rasterizer};
pub use error::{RasterError, Result};
pub use geometry::{point_segment_distance_sq, RingCells};
pub use mask::{CellMask, ExclusionMask, NoExclusion};
pub use ranker::ContourRanker;
pub use spatial_index::{GridAlignment, IndexStats, SegmentRef, SpatialIndex};
pub use types::{validate_strips, BoundingBox, CellCoord, Extent, LineStrip, Point, RasterArea};

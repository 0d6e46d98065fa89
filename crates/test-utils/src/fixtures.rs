//! Common test fixtures for contour rasterization tests.
//!
//! Small hand-built scenarios whose expected heights can be worked out on
//! paper.

use contour_raster::{BoundingBox, Extent, LineStrip, Point};

/// Common bounding box definitions for testing.
pub mod bbox {
    /// The unit square.
    pub const UNIT: (f64, f64, f64, f64) = (0.0, 0.0, 1.0, 1.0);

    /// Lower-left quarter of the unit square.
    pub const LOWER_LEFT: (f64, f64, f64, f64) = (0.0, 0.0, 0.5, 0.5);

    /// A 1000 x 500 world-unit map sheet.
    pub const SHEET: (f64, f64, f64, f64) = (0.0, 0.0, 1000.0, 500.0);
}

/// Convert a fixture tuple into a [`BoundingBox`].
pub fn to_bbox(b: (f64, f64, f64, f64)) -> BoundingBox {
    BoundingBox::new(b.0, b.1, b.2, b.3)
}

/// The unit extent used by most fixtures.
pub fn unit_extent() -> Extent {
    Extent {
        x_max: 1.0,
        y_max: 1.0,
    }
}

/// One diagonal contour at elevation 100 from (0.1, 0.1) to (0.9, 0.9).
///
/// On a 4×4 grid the segment is registered only in cells (0, 0) and
/// (3, 3).
pub fn diagonal_strip() -> Vec<LineStrip> {
    vec![LineStrip {
        elevation_id: 1,
        elevation: 100.0,
        points: vec![Point::new(0.1, 0.1), Point::new(0.9, 0.9)],
    }]
}

/// Two horizontal contours: elevation 0 at `y = 0.25` and elevation 100 at
/// `y = 0.75`, each with a vertex every 0.25 along x.
///
/// Any point on `y = 0.5` is equidistant from both.
pub fn parallel_pair() -> Vec<LineStrip> {
    let line = |id: i32, elevation: f64, y: f64| LineStrip {
        elevation_id: id,
        elevation,
        points: (0..=4).map(|k| Point::new(k as f64 * 0.25, y)).collect(),
    };
    vec![line(1, 0.0, 0.25), line(2, 100.0, 0.75)]
}

/// Three horizontal contours at 0, 50 and 100 where the middle level is
/// split into two strips that share an elevation id.
pub fn split_middle_level() -> Vec<LineStrip> {
    vec![
        LineStrip {
            elevation_id: 10,
            elevation: 0.0,
            points: vec![Point::new(0.0, 0.2), Point::new(1.0, 0.2)],
        },
        LineStrip {
            elevation_id: 20,
            elevation: 50.0,
            points: vec![Point::new(0.0, 0.5), Point::new(0.5, 0.5)],
        },
        LineStrip {
            elevation_id: 20,
            elevation: 50.0,
            points: vec![Point::new(0.5, 0.5), Point::new(1.0, 0.5)],
        },
        LineStrip {
            elevation_id: 30,
            elevation: 100.0,
            points: vec![Point::new(0.0, 0.8), Point::new(1.0, 0.8)],
        },
    ]
}

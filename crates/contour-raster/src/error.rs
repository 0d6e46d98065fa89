//! Error types for contour rasterization.

use thiserror::Error;

/// Errors raised while validating inputs ahead of a rasterization pass.
///
/// Nothing inside a pass returns an error: degenerate pixels are written as
/// [`NO_DATA`](crate::NO_DATA) instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    /// Configuration value out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// A line strip has fewer than two points and so no segments.
    #[error("line strip {index} (elevation id {elevation_id}) has {points} point(s), need at least 2")]
    DegenerateStrip {
        index: usize,
        elevation_id: i32,
        points: usize,
    },

    /// A coordinate or elevation is NaN or infinite.
    #[error("line strip {index} contains a non-finite value")]
    NonFinite { index: usize },

    /// Normalization bounds must be strictly positive.
    #[error("invalid extent: x_max={x_max}, y_max={y_max}")]
    InvalidExtent { x_max: f64, y_max: f64 },

    /// Raster area is empty or inverted.
    #[error("invalid raster area: {0}")]
    InvalidArea(String),

    /// Output buffer does not match `width * height`.
    #[error("output buffer has {actual} elements, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// Bounding box string could not be parsed.
    #[error("invalid bounding box '{0}': expected minx,miny,maxx,maxy")]
    BboxParse(String),
}

impl RasterError {
    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an InvalidArea error.
    pub fn invalid_area(msg: impl Into<String>) -> Self {
        Self::InvalidArea(msg.into())
    }
}

/// Result type for rasterization setup.
pub type Result<T> = std::result::Result<T, RasterError>;

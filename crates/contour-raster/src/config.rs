//! Configuration for index construction and rasterization.

use crate::error::{RasterError, Result};
use crate::spatial_index::GridAlignment;
use serde::{Deserialize, Serialize};

/// Largest accepted grid side. The index allocates `size²` buckets.
pub const MAX_GRID_SIZE: usize = 16_384;

/// Tunables for the spatial index and the rasterization engine.
///
/// None of these are hard-wired into the algorithms; every value is read
/// from here at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Number of bucket grid cells along each axis.
    pub grid_size: usize,

    /// Offset applied to normalized coordinates before bucketing.
    pub grid_alignment: GridAlignment,

    /// Extra rings searched after the first ring that produced a candidate.
    pub overrun_rings: usize,

    /// Squared distance below which a segment counts as an exact hit.
    pub exact_hit_epsilon: f64,

    /// Number of column ranges a raster is split into.
    pub column_splits: usize,

    /// Line mask hit distance, in multiples of the pixel pitch.
    pub line_mask_wiggle: f64,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            grid_size: 256,
            grid_alignment: GridAlignment::default(),
            overrun_rings: 2,
            exact_hit_epsilon: 1e-12,
            column_splits: 8,
            line_mask_wiggle: 0.5,
        }
    }
}

impl RasterConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CONTOUR_GRID_SIZE") {
            if let Ok(size) = val.parse() {
                config.grid_size = size;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_GRID_OFFSET_X") {
            if let Ok(offset) = val.parse() {
                config.grid_alignment.offset_x = offset;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_GRID_OFFSET_Y") {
            if let Ok(offset) = val.parse() {
                config.grid_alignment.offset_y = offset;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_OVERRUN_RINGS") {
            if let Ok(rings) = val.parse() {
                config.overrun_rings = rings;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_EXACT_HIT_EPSILON") {
            if let Ok(eps) = val.parse() {
                config.exact_hit_epsilon = eps;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_COLUMN_SPLITS") {
            if let Ok(splits) = val.parse() {
                config.column_splits = splits;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_LINE_WIGGLE") {
            if let Ok(wiggle) = val.parse() {
                config.line_mask_wiggle = wiggle;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(RasterError::config(format!(
                "grid_size must be 1-{}, got {}",
                MAX_GRID_SIZE, self.grid_size
            )));
        }

        let GridAlignment { offset_x, offset_y } = self.grid_alignment;
        if !offset_x.is_finite() || !offset_y.is_finite() || offset_x.abs() >= 1.0 || offset_y.abs() >= 1.0 {
            return Err(RasterError::config(
                "grid_alignment offsets must be finite and within (-1, 1)",
            ));
        }

        if !self.exact_hit_epsilon.is_finite() || self.exact_hit_epsilon < 0.0 {
            return Err(RasterError::config("exact_hit_epsilon must be finite and >= 0"));
        }

        if self.column_splits == 0 {
            return Err(RasterError::config("column_splits must be > 0"));
        }

        if !self.line_mask_wiggle.is_finite() || self.line_mask_wiggle <= 0.0 {
            return Err(RasterError::config("line_mask_wiggle must be finite and > 0"));
        }

        Ok(())
    }

    /// Builder-style override of the column split factor.
    pub fn with_column_splits(mut self, splits: usize) -> Self {
        self.column_splits = splits;
        self
    }

    /// Builder-style override of the grid size.
    pub fn with_grid_size(mut self, size: usize) -> Self {
        self.grid_size = size;
        self
    }
}

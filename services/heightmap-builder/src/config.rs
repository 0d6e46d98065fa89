//! Rasterization settings for a build.
//!
//! Settings come from a YAML file when one is given, otherwise from the
//! `CONTOUR_*` environment variables. Command-line flags override either.

use std::path::Path;

use anyhow::{Context, Result};
use contour_raster::RasterConfig;
use tracing::debug;

/// Command-line overrides applied on top of the loaded settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub grid_size: Option<usize>,
    pub overrun_rings: Option<usize>,
    pub column_splits: Option<usize>,
    pub line_wiggle: Option<f64>,
}

/// Load a [`RasterConfig`] from a YAML file.
///
/// Keys missing from the file keep their defaults.
pub fn load_yaml(path: &Path) -> Result<RasterConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: RasterConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    debug!(path = %path.display(), grid_size = config.grid_size, "Loaded raster config");
    Ok(config)
}

/// Resolve the effective configuration and validate it.
pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<RasterConfig> {
    let mut config = match path {
        Some(path) => load_yaml(path)?,
        None => RasterConfig::from_env(),
    };

    if let Some(size) = overrides.grid_size {
        config.grid_size = size;
    }
    if let Some(rings) = overrides.overrun_rings {
        config.overrun_rings = rings;
    }
    if let Some(splits) = overrides.column_splits {
        config.column_splits = splits;
    }
    if let Some(wiggle) = overrides.line_wiggle {
        config.line_mask_wiggle = wiggle;
    }

    config.validate().context("Invalid raster configuration")?;
    Ok(config)
}

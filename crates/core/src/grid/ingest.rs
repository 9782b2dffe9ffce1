//! Elevation raster ingest pipeline
//!
//! Turns a decoded single-band elevation raster into the display-ready
//! `ElevationGrid`. The pipeline order matches the reference tool and
//! must not be reordered:
//!
//! 1. mask values outside the configured altitude range to NaN;
//! 2. downsample by the resolution factor (bilinear, order 1);
//! 3. rotate 270 degrees (three 90-degree turns) so raster row/column
//!    order matches the mesh convention of Y decreasing from the top
//!    bound -- this rotation count is a correctness requirement, not
//!    cosmetic;
//! 4. multiply by the height scale, then apply `ln(1 + (v*s + 1))` to
//!    compress dynamic range.
//!
//! Raster decoding itself is an external concern: `open_elevation_band`
//! wraps GDAL behind the `gdal` cargo feature and reports failures as
//! `SimError::DataSource`, which callers recover from with
//! `ElevationGrid::flat`.

use crate::error::SimError;
use crate::grid::resample::resize_bilinear;
use crate::grid::terrain::{ElevationGrid, GeoBounds};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use std::path::Path;

/// A decoded single-band elevation raster
///
/// Produced by `open_elevation_band` or assembled directly by embedders
/// that bring their own raster reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterBand {
    /// Band values in row-major order: `[row * cols + col]`
    pub data: Vec<f32>,
    /// Number of rows (raster Y size)
    pub rows: usize,
    /// Number of columns (raster X size)
    pub cols: usize,
    /// Geographic bounds of the band
    pub bounds: GeoBounds,
    /// Source-declared "no data" value, masked during ingest
    pub nodata: Option<f32>,
}

/// Ingest pipeline configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Lowest altitude kept, in meters (below: masked to NaN)
    pub altitude_min: f32,
    /// Highest altitude kept, in meters (above: masked to NaN)
    pub altitude_max: f32,
    /// Resolution reduction factor applied to both axes
    pub downsample: f32,
    /// Height multiplier applied before the log compression
    pub height_scale: f32,
}

impl Default for IngestConfig {
    /// Reference configuration: altitudes in [-12000, 5000] m, half
    /// resolution, height scale 5
    fn default() -> Self {
        IngestConfig {
            altitude_min: -12000.0,
            altitude_max: 5000.0,
            downsample: 0.5,
            height_scale: 5.0,
        }
    }
}

/// Log-compressed height scaling: `ln(1 + (v * scale + 1))`
///
/// Handles below-sea-level heights: when the log argument would be
/// non-positive (scaled value at or below -2) the transform yields 0
/// instead of an invalid result. NaN sentinels pass through unchanged.
#[inline]
pub fn scale_height(value: f32, scale: f32) -> f32 {
    if value.is_nan() {
        return f32::NAN;
    }
    let a = value * scale + 1.0;
    if a <= -1.0 {
        0.0
    } else {
        a.ln_1p()
    }
}

/// Rotate a row-major grid 90 degrees counter-clockwise
///
/// Returns the rotated data with swapped dimensions (`cols x rows`).
fn rotate90(data: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let mut out = vec![0.0; rows * cols];
    for i in 0..cols {
        for j in 0..rows {
            // out[i, j] = in[j, cols - 1 - i]
            out[i * rows + j] = data[j * cols + (cols - 1 - i)];
        }
    }
    out
}

/// Run the full ingest pipeline on a decoded band
///
/// # Errors
/// Returns `SimError::Shape` if the band is empty or its data length
/// does not match its declared shape.
pub fn ingest_elevation(band: &RasterBand, config: &IngestConfig) -> Result<ElevationGrid, SimError> {
    if band.rows == 0 || band.cols == 0 {
        return Err(SimError::Shape { context: "ingest band", rows: band.rows, cols: band.cols });
    }
    if band.data.len() != band.rows * band.cols {
        return Err(SimError::Shape { context: "ingest band", rows: band.rows, cols: band.cols });
    }

    // 1. Mask out-of-range and nodata cells
    let masked: Vec<f32> = band
        .data
        .iter()
        .map(|&v| {
            let is_nodata = band.nodata.is_some_and(|nd| (v - nd).abs() < 1e-6);
            if is_nodata || !(config.altitude_min..=config.altitude_max).contains(&v) {
                f32::NAN
            } else {
                v
            }
        })
        .collect();

    // 2. Downsample by the resolution factor
    let out_rows = ((band.rows as f32 * config.downsample).round() as usize).max(1);
    let out_cols = ((band.cols as f32 * config.downsample).round() as usize).max(1);
    let reduced = resize_bilinear(&masked, band.rows, band.cols, out_rows, out_cols);
    debug!(
        "Downsampled elevation band {}x{} -> {}x{} (factor {})",
        band.rows, band.cols, out_rows, out_cols, config.downsample
    );

    // 3. Rotate 270 degrees: three 90-degree turns
    let mut data = reduced;
    let (mut rows, mut cols) = (out_rows, out_cols);
    for _ in 0..3 {
        data = rotate90(&data, rows, cols);
        std::mem::swap(&mut rows, &mut cols);
    }

    // 4. Scale and log-compress
    for v in &mut data {
        *v = scale_height(*v, config.height_scale);
    }

    ElevationGrid::from_data(data, rows, cols, band.bounds)
}

/// Read band 1 of a georeferenced elevation raster
///
/// Bounds are derived from the dataset geo-transform.
///
/// # Errors
/// Returns `SimError::DataSource` when the file cannot be opened or
/// read. Callers must recover by substituting `ElevationGrid::flat`;
/// a missing raster never aborts the process.
#[cfg(feature = "gdal")]
pub fn open_elevation_band(path: &Path) -> Result<RasterBand, SimError> {
    use gdal::Dataset;

    let dataset = Dataset::open(path)
        .map_err(|e| SimError::DataSource(format!("failed to open raster: {e}")))?;
    let band = dataset
        .rasterband(1)
        .map_err(|e| SimError::DataSource(format!("failed to read band 1: {e}")))?;

    let (cols, rows) = (band.x_size(), band.y_size());
    let buffer = band
        .read_as::<f32>((0, 0), (cols, rows), (cols, rows), None)
        .map_err(|e| SimError::DataSource(format!("failed to read raster data: {e}")))?;
    let nodata = band.no_data_value().map(|v| v as f32);

    let gt = dataset
        .geo_transform()
        .map_err(|e| SimError::DataSource(format!("missing geo-transform: {e}")))?;
    let left = gt[0] as f32;
    let top = gt[3] as f32;
    let right = (gt[0] + gt[1] * cols as f64) as f32;
    let bottom = (gt[3] + gt[5] * rows as f64) as f32;

    info!(
        "Opened elevation raster {}: {}x{} cells, bounds [{}, {}] x [{}, {}]",
        path.display(),
        rows,
        cols,
        left,
        right,
        bottom,
        top
    );

    Ok(RasterBand {
        data: buffer.data,
        rows,
        cols,
        bounds: GeoBounds::new(left, right, top, bottom),
        nodata,
    })
}

/// Read band 1 of a georeferenced elevation raster (stub when the
/// `gdal` feature is disabled)
///
/// # Errors
/// Always returns `SimError::DataSource`; enable the `gdal` feature to
/// read real rasters. Callers fall back to `ElevationGrid::flat`.
#[cfg(not(feature = "gdal"))]
pub fn open_elevation_band(path: &Path) -> Result<RasterBand, SimError> {
    Err(SimError::DataSource(format!(
        "raster support requires the 'gdal' feature (requested: {})",
        path.display()
    )))
}

/// Open a raster and run the ingest pipeline in one call
///
/// # Errors
/// Returns `SimError::DataSource` if the raster cannot be read, or
/// `SimError::Shape` if the decoded band is degenerate.
pub fn load_elevation(path: &Path, config: &IngestConfig) -> Result<ElevationGrid, SimError> {
    let band = open_elevation_band(path)?;
    let grid = ingest_elevation(&band, config)?;
    info!(
        "Ingested elevation grid: {}x{} cells, height range {:?}",
        grid.rows(),
        grid.cols(),
        grid.height_range()
    );
    Ok(grid)
}

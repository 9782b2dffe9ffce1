//! Terrain-side data model
//!
//! `ElevationGrid` holds the ingested elevation raster: row-major
//! heights with geographic bounds. Cells masked out during ingest carry
//! the NaN sentinel and propagate through downstream arithmetic as
//! rendering gaps. `CoordinateMesh` pairs every cell with its linearly
//! interpolated geographic X/Y position.

use crate::error::SimError;
use crate::simulation::ScalarField;
use serde::{Deserialize, Serialize};

/// Geographic bounds of an elevation raster
///
/// The Y axis follows raster convention: `top > bottom`, so mesh Y
/// values decrease from row 0 downwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Westernmost coordinate
    pub left: f32,
    /// Easternmost coordinate
    pub right: f32,
    /// Northernmost coordinate
    pub top: f32,
    /// Southernmost coordinate
    pub bottom: f32,
}

impl GeoBounds {
    /// Create bounds from the four edge coordinates
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        GeoBounds { left, right, top, bottom }
    }

    /// Unit-square bounds, used when no raster is available
    pub fn unit() -> Self {
        GeoBounds { left: 0.0, right: 1.0, top: 1.0, bottom: 0.0 }
    }
}

/// Ingested elevation data with geographic bounds
///
/// Created once at startup by the ingest pipeline (or the flat
/// fallback) and immutable thereafter. Heights are display-scaled, not
/// raw meters; see `ingest_elevation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationGrid {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    /// Heights in row-major order: `[row * cols + col]`; NaN = no data
    pub(crate) data: Vec<f32>,
    pub(crate) bounds: GeoBounds,
}

impl ElevationGrid {
    /// Create flat terrain at height zero
    ///
    /// This is the mandated fallback when the raster source cannot be
    /// read: later simulation runs proceed over a featureless surface.
    pub fn flat(rows: usize, cols: usize, bounds: GeoBounds) -> Self {
        ElevationGrid {
            rows,
            cols,
            data: vec![0.0; rows * cols],
            bounds,
        }
    }

    /// Create a grid from row-major height data
    ///
    /// # Errors
    /// Returns `SimError::Shape` if `data.len() != rows * cols`.
    pub fn from_data(
        data: Vec<f32>,
        rows: usize,
        cols: usize,
        bounds: GeoBounds,
    ) -> Result<Self, SimError> {
        if data.len() != rows * cols {
            return Err(SimError::Shape { context: "elevation data", rows, cols });
        }
        Ok(ElevationGrid { rows, cols, data, bounds })
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Geographic bounds
    #[inline]
    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    /// Height at grid position (NaN for masked cells)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    /// Raw row-major height data
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Min and max height over non-sentinel cells
    ///
    /// Returns `None` when every cell is masked.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        let mut range: Option<(f32, f32)> = None;
        for &v in &self.data {
            if v.is_nan() {
                continue;
            }
            range = Some(match range {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        range
    }
}

/// Paired X/Y coordinate arrays, one value per grid cell
///
/// X spans `left..right` across columns; Y spans `top..bottom` down
/// rows, so Y decreases with increasing row index. Derived
/// deterministically from bounds and shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinateMesh {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) x: Vec<f32>,
    pub(crate) y: Vec<f32>,
}

/// Evenly spaced values from `start` to `end` inclusive
fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    if n <= 1 {
        return vec![start; n];
    }
    let step = (end - start) / (n - 1) as f32;
    (0..n).map(|i| start + step * i as f32).collect()
}

impl CoordinateMesh {
    /// Build the mesh for a grid of the given shape and bounds
    pub fn from_bounds(bounds: GeoBounds, rows: usize, cols: usize) -> Self {
        let xs = linspace(bounds.left, bounds.right, cols);
        let ys = linspace(bounds.top, bounds.bottom, rows);

        let mut x = Vec::with_capacity(rows * cols);
        let mut y = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                x.push(xs[c]);
                y.push(ys[r]);
            }
        }

        CoordinateMesh { rows, cols, x, y }
    }

    /// Assemble a mesh from resized component arrays
    ///
    /// # Errors
    /// Returns `SimError::Shape` if either component length does not
    /// match `rows * cols`.
    pub fn from_components(
        x: Vec<f32>,
        y: Vec<f32>,
        rows: usize,
        cols: usize,
    ) -> Result<Self, SimError> {
        if x.len() != rows * cols || y.len() != rows * cols {
            return Err(SimError::Shape { context: "mesh components", rows, cols });
        }
        Ok(CoordinateMesh { rows, cols, x, y })
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// X coordinate at grid position
    #[inline]
    pub fn x_at(&self, row: usize, col: usize) -> f32 {
        self.x[row * self.cols + col]
    }

    /// Y coordinate at grid position
    #[inline]
    pub fn y_at(&self, row: usize, col: usize) -> f32 {
        self.y[row * self.cols + col]
    }

    /// Raw row-major X values
    #[inline]
    pub fn x_slice(&self) -> &[f32] {
        &self.x
    }

    /// Raw row-major Y values
    #[inline]
    pub fn y_slice(&self) -> &[f32] {
        &self.y
    }
}

/// Elevation grid and coordinate mesh resized to the simulation
/// resolution, read-only for the duration of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResampledTerrain {
    /// Terrain height at simulation resolution (NaN = gap)
    pub height: ScalarField,
    /// Coordinate mesh at simulation resolution
    pub mesh: CoordinateMesh,
}

impl ResampledTerrain {
    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.height.rows()
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.height.cols()
    }
}

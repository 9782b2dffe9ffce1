//! Scalar intensity field on the simulation grid
//!
//! `ScalarField` is the 2D array the diffusion engine operates on:
//! row-major `f32` storage with explicit dimensions, created fresh per
//! simulation run with a single seeded cell at the blast origin.

use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// A 2D scalar field in row-major order: `[row * cols + col]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalarField {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) data: Vec<f32>,
}

impl ScalarField {
    /// Create an all-zero field
    pub fn zeros(rows: usize, cols: usize) -> Self {
        ScalarField {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a field from existing row-major data
    ///
    /// # Errors
    /// Returns `SimError::Shape` if `data.len() != rows * cols`.
    pub fn from_data(data: Vec<f32>, rows: usize, cols: usize) -> Result<Self, SimError> {
        if data.len() != rows * cols {
            return Err(SimError::Shape { context: "field data", rows, cols });
        }
        Ok(ScalarField { rows, cols, data })
    }

    /// Create an all-zero field with a single seeded cell at `origin`
    ///
    /// This is the initial condition of every simulation run: intensity
    /// `intensity` at the blast origin, zero everywhere else.
    ///
    /// # Errors
    /// Returns `SimError::OutOfBounds` if the origin lies outside
    /// `[0, rows) x [0, cols)`. No field is allocated in that case.
    pub fn seeded(
        rows: usize,
        cols: usize,
        origin: (usize, usize),
        intensity: f32,
    ) -> Result<Self, SimError> {
        let (x, y) = origin;
        if x >= rows || y >= cols {
            return Err(SimError::OutOfBounds { x, y, rows, cols });
        }
        let mut field = ScalarField::zeros(rows, cols);
        field.data[x * cols + y] = intensity;
        Ok(field)
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

    /// Value at grid position
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    /// Raw row-major data
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw data, for stencil kernels within the crate
    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Largest cell value, or negative infinity for an empty field
    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Sum over all cells, accumulated in f64 for conservation checks
    pub fn total(&self) -> f64 {
        self.data.iter().map(|&v| f64::from(v)).sum()
    }
}

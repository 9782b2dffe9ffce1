//! Explicit finite-difference diffusion stepper
//!
//! Advances the blast-intensity field by one time step of the 2D heat
//! equation:
//! ```text
//! next[i,j] = cur[i,j] + D*dt * ( (cur[i+1,j] - 2*cur[i,j] + cur[i-1,j]) / dx^2
//!                               + (cur[i,j+1] - 2*cur[i,j] + cur[i,j-1]) / dy^2 )
//! ```
//! applied to interior cells only. The outer boundary ring is carried
//! over unchanged every step, a fixed-value boundary condition: no
//! index wrapping, no reflection.
//!
//! # Stability
//!
//! The explicit scheme is conditionally stable. The caller must choose
//! parameters satisfying `D*dt*(1/dx^2 + 1/dy^2) <= 0.5`; this is a
//! documented precondition, not enforced at runtime, and violating it
//! diverges (values grow unbounded). See `DiffusionParams::is_stable`.
//!
//! All reads come from the pre-step snapshot, so interior cells are
//! independent within a step and iteration order does not affect the
//! result.

use crate::simulation::field::ScalarField;
use serde::{Deserialize, Serialize};

/// Numerical parameters of the diffusion scheme
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiffusionParams {
    /// Diffusion coefficient D
    pub diffusion: f32,
    /// Spatial step along the row axis
    pub dx: f32,
    /// Spatial step along the column axis
    pub dy: f32,
    /// Time step
    pub dt: f32,
}

impl Default for DiffusionParams {
    /// Reference parameters: `D = 1`, `dx = dy = 1`, `dt = 0.15`
    fn default() -> Self {
        DiffusionParams { diffusion: 1.0, dx: 1.0, dy: 1.0, dt: 0.15 }
    }
}

impl DiffusionParams {
    /// The stability number `D*dt*(1/dx^2 + 1/dy^2)`
    ///
    /// The explicit scheme is stable while this stays at or below 0.5.
    pub fn stability_number(&self) -> f32 {
        self.diffusion * self.dt * (1.0 / (self.dx * self.dx) + 1.0 / (self.dy * self.dy))
    }

    /// Whether the parameters satisfy the explicit stability bound
    pub fn is_stable(&self) -> bool {
        self.stability_number() <= 0.5
    }

    /// Largest stable time step for the current `D`, `dx`, `dy`
    ///
    /// Infinite when `D <= 0` (nothing diffuses, any step is stable).
    pub fn max_stable_dt(&self) -> f32 {
        if self.diffusion <= 0.0 {
            return f32::INFINITY;
        }
        0.5 / (self.diffusion * (1.0 / (self.dx * self.dx) + 1.0 / (self.dy * self.dy)))
    }
}

/// Advance the field by one time step
///
/// Pure over the full grid state: the input field is left untouched and
/// the next state is returned, so callers can compare before/after
/// snapshots. Grids too small to have an interior (< 3 cells on either
/// axis) are returned unchanged.
pub fn diffusion_step(field: &ScalarField, params: DiffusionParams) -> ScalarField {
    let rows = field.rows();
    let cols = field.cols();

    let mut next = field.clone();
    if rows < 3 || cols < 3 {
        return next;
    }

    let inv_dx2 = 1.0 / (params.dx * params.dx);
    let inv_dy2 = 1.0 / (params.dy * params.dy);
    let d_dt = params.diffusion * params.dt;

    let cur = field.as_slice();
    let out = next.data_mut();

    for i in 1..rows - 1 {
        let row = i * cols;
        for j in 1..cols - 1 {
            let idx = row + j;
            let center = cur[idx];
            let lap_x = (cur[idx + cols] - 2.0 * center + cur[idx - cols]) * inv_dx2;
            let lap_y = (cur[idx + 1] - 2.0 * center + cur[idx - 1]) * inv_dy2;
            out[idx] = center + d_dt * (lap_x + lap_y);
        }
    }

    next
}

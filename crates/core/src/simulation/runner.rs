//! Simulation loop orchestration
//!
//! Drives the diffusion stepper frame by frame: seed the field, step,
//! combine with terrain height into the display surface, hand the frame
//! to the rendering callback, repeat until the duration is exhausted or
//! the run is cancelled. Stepping and rendering alternate strictly on
//! one thread; the callback is invoked inline before the next step.

use crate::error::SimError;
use crate::grid::terrain::ResampledTerrain;
use crate::simulation::diffusion::{diffusion_step, DiffusionParams};
use crate::simulation::field::ScalarField;
use crate::simulation::scenario::BlastPreset;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default side length of the square simulation grid
pub const SIM_GRID_SIZE: usize = 100;

/// Everything a single simulation run needs, immutable for its lifetime
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Diffusion coefficient D
    pub diffusion: f32,
    /// Spatial step along the row axis
    pub dx: f32,
    /// Spatial step along the column axis
    pub dy: f32,
    /// Time step
    pub dt: f32,
    /// Intensity seeded at the origin cell (I0)
    pub initial_intensity: f32,
    /// Total simulated duration (T)
    pub duration: f32,
    /// Blast origin as (row, col) grid coordinates
    pub origin: (usize, usize),
}

impl SimulationParameters {
    /// Build run parameters from a blast preset and target cell, with
    /// the reference numerical scheme (`D = 1`, `dx = dy = 1`,
    /// `dt = 0.15`)
    pub fn from_preset(preset: &BlastPreset, origin: (usize, usize)) -> Self {
        let numerics = DiffusionParams::default();
        SimulationParameters {
            diffusion: numerics.diffusion,
            dx: numerics.dx,
            dy: numerics.dy,
            dt: numerics.dt,
            initial_intensity: preset.initial_intensity,
            duration: preset.duration,
            origin,
        }
    }

    /// The numerical parameters of the scheme
    pub fn diffusion_params(&self) -> DiffusionParams {
        DiffusionParams {
            diffusion: self.diffusion,
            dx: self.dx,
            dy: self.dy,
            dt: self.dt,
        }
    }

    /// Number of loop iterations: `floor(duration / dt)`
    pub fn step_count(&self) -> usize {
        if self.dt > 0.0 && self.duration > 0.0 {
            (self.duration / self.dt).floor() as usize
        } else {
            0
        }
    }
}

/// Shared "run is active" flag enabling external cancellation
///
/// One writer flips the flag from active to inactive exactly once per
/// run (a UI close action, or the loop itself on completion); the loop
/// thread reads it between steps. The transition is monotonic, so
/// relaxed atomics suffice. Multiple independent writers would need
/// stronger synchronization than this type provides.
#[derive(Debug, Clone)]
pub struct RunState {
    active: Arc<AtomicBool>,
}

impl RunState {
    /// Create an active run state
    pub fn new() -> Self {
        RunState { active: Arc::new(AtomicBool::new(true)) }
    }

    /// Whether the run should keep going
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Request cancellation; observed within one step's latency.
    /// Idempotent: the flag never transitions back to active.
    pub fn cancel(&self) {
        self.active.store(false, Ordering::Relaxed);
    }
}

impl Default for RunState {
    fn default() -> Self {
        RunState::new()
    }
}

/// Outcome of a completed or cancelled run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunSummary {
    /// Steps executed before completion or cancellation
    pub steps_completed: usize,
    /// Whether the run stopped early via the run state
    pub cancelled: bool,
    /// Largest intensity observed over the run
    pub peak_intensity: f32,
}

/// Terrain height plus the normalized wave contribution
///
/// The wave height is `(field / max(field)) * 0.5`, renormalized every
/// frame so the visual wave height is independent of absolute
/// intensity. When the field maximum is not positive the ratio is
/// treated as 0 rather than dividing by zero.
pub fn display_surface(terrain: &ResampledTerrain, field: &ScalarField) -> ScalarField {
    let peak = field.max();
    let gain = if peak > 0.0 { 0.5 / peak } else { 0.0 };

    let mut surface = terrain.height.clone();
    let out = surface.data_mut();
    for (s, &v) in out.iter_mut().zip(field.as_slice()) {
        *s += v * gain;
    }
    surface
}

/// Run one simulation to completion, cancellation, or error
///
/// Seeds a fresh field sized to the terrain, then iterates
/// `floor(duration / dt)` times. Each iteration checks the run state,
/// advances the field one diffusion step, builds the display surface,
/// and invokes `on_frame(step_index, display_surface, field)`
/// synchronously so the caller can render before the next step.
///
/// On natural completion the run state is set inactive, so a
/// `RunState` is never reused across runs.
///
/// # Errors
/// - `SimError::Shape` if the terrain grid is degenerate;
/// - `SimError::OutOfBounds` if the origin lies outside the terrain
///   grid. No stepping or callback happens in either case.
pub fn run_simulation<F>(
    params: &SimulationParameters,
    terrain: &ResampledTerrain,
    state: &RunState,
    mut on_frame: F,
) -> Result<RunSummary, SimError>
where
    F: FnMut(usize, &ScalarField, &ScalarField),
{
    let rows = terrain.rows();
    let cols = terrain.cols();
    if rows == 0 || cols == 0 {
        return Err(SimError::Shape { context: "simulation terrain", rows, cols });
    }

    let mut field = ScalarField::seeded(rows, cols, params.origin, params.initial_intensity)?;

    let numerics = params.diffusion_params();
    if !numerics.is_stable() {
        warn!(
            "Stability number {:.3} exceeds 0.5 (max stable dt {:.4}); output will diverge",
            numerics.stability_number(),
            numerics.max_stable_dt()
        );
    }

    let steps = params.step_count();
    info!(
        "Starting run: {}x{} grid, I0={} at ({}, {}), {} steps of dt={}",
        rows, cols, params.initial_intensity, params.origin.0, params.origin.1, steps, params.dt
    );

    let mut peak_intensity = 0.0_f32;
    let mut steps_completed = 0;
    let mut cancelled = false;

    for step in 0..steps {
        // Cooperative cancellation, checked once per iteration boundary
        if !state.is_active() {
            cancelled = true;
            debug!("Run cancelled at step {step}");
            break;
        }

        field = diffusion_step(&field, numerics);
        peak_intensity = peak_intensity.max(field.max());

        let surface = display_surface(terrain, &field);
        on_frame(step, &surface, &field);
        steps_completed += 1;
    }

    if !cancelled {
        state.cancel();
    }
    info!(
        "Run finished: {} of {} steps, cancelled={}, peak intensity {}",
        steps_completed, steps, cancelled, peak_intensity
    );

    Ok(RunSummary { steps_completed, cancelled, peak_intensity })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::resample::resample_terrain;
    use crate::grid::terrain::{CoordinateMesh, ElevationGrid, GeoBounds};
    use approx::assert_relative_eq;

    fn flat_terrain(size: usize) -> ResampledTerrain {
        let bounds = GeoBounds::unit();
        let grid = ElevationGrid::flat(size, size, bounds);
        let mesh = CoordinateMesh::from_bounds(bounds, size, size);
        resample_terrain(&grid, &mesh, size, size).unwrap()
    }

    fn reference_params() -> SimulationParameters {
        SimulationParameters::from_preset(&BlastPreset::little_boy(), (25, 25))
    }

    #[test]
    fn test_step_count() {
        let params = reference_params();
        // floor(20 / 0.15) = 133
        assert_eq!(params.step_count(), 133);

        let degenerate = SimulationParameters { dt: 0.0, ..params };
        assert_eq!(degenerate.step_count(), 0);
    }

    #[test]
    fn test_run_invokes_callback_every_step() {
        let terrain = flat_terrain(100);
        let mut params = reference_params();
        params.duration = 1.5; // 10 steps

        let state = RunState::new();
        let mut frames = Vec::new();
        let summary = run_simulation(&params, &terrain, &state, |step, _, field| {
            frames.push((step, field.total()));
        })
        .unwrap();

        assert_eq!(summary.steps_completed, 10);
        assert!(!summary.cancelled);
        assert_eq!(frames.len(), 10);
        assert_eq!(frames[0].0, 0);
        assert_eq!(frames[9].0, 9);
        // Natural completion clears the flag: no accidental reuse
        assert!(!state.is_active());
    }

    #[test]
    fn test_cancel_before_run_means_zero_frames() {
        let terrain = flat_terrain(100);
        let params = reference_params();

        let state = RunState::new();
        state.cancel();
        state.cancel(); // idempotent

        let mut frames = 0_usize;
        let summary = run_simulation(&params, &terrain, &state, |_, _, _| frames += 1).unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.steps_completed, 0);
        assert_eq!(frames, 0);
    }

    #[test]
    fn test_cancel_mid_run_observed_at_step_boundary() {
        let terrain = flat_terrain(100);
        let mut params = reference_params();
        params.duration = 15.0; // 100 steps

        let state = RunState::new();
        let canceller = state.clone();
        let mut frames = 0_usize;
        let summary = run_simulation(&params, &terrain, &state, |step, _, _| {
            frames += 1;
            if step == 4 {
                canceller.cancel();
            }
        })
        .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.steps_completed, 5);
        assert_eq!(frames, 5);
    }

    #[test]
    fn test_out_of_bounds_origin_rejected_before_any_frame() {
        let terrain = flat_terrain(50);
        let mut params = reference_params();
        params.origin = (50, 10);

        let state = RunState::new();
        let mut frames = 0_usize;
        let result = run_simulation(&params, &terrain, &state, |_, _, _| frames += 1);

        assert!(matches!(result, Err(SimError::OutOfBounds { x: 50, y: 10, .. })));
        assert_eq!(frames, 0);
    }

    #[test]
    fn test_degenerate_terrain_rejected() {
        let bounds = GeoBounds::unit();
        let terrain = ResampledTerrain {
            height: ScalarField::zeros(0, 0),
            mesh: CoordinateMesh::from_bounds(bounds, 0, 0),
        };
        let state = RunState::new();
        let result = run_simulation(&reference_params(), &terrain, &state, |_, _, _| {});
        assert!(matches!(result, Err(SimError::Shape { .. })));
    }

    #[test]
    fn test_display_surface_normalized_to_half() {
        let terrain = flat_terrain(10);
        let field = ScalarField::seeded(10, 10, (4, 4), 800.0).unwrap();
        let surface = display_surface(&terrain, &field);

        // Peak cell contributes exactly 0.5 over flat terrain
        assert_relative_eq!(surface.get(4, 4), 0.5);
        assert_relative_eq!(surface.get(0, 0), 0.0);
    }

    #[test]
    fn test_display_surface_zero_field_guard() {
        let terrain = flat_terrain(10);
        let field = ScalarField::zeros(10, 10);
        let surface = display_surface(&terrain, &field);

        // All-zero field: ratio resolves to 0, never NaN or infinity
        for &v in surface.as_slice() {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn test_display_surface_adds_to_terrain_height() {
        let bounds = GeoBounds::unit();
        let grid =
            ElevationGrid::from_data(vec![2.0; 64], 8, 8, bounds).unwrap();
        let mesh = CoordinateMesh::from_bounds(bounds, 8, 8);
        let terrain = resample_terrain(&grid, &mesh, 8, 8).unwrap();

        let field = ScalarField::seeded(8, 8, (3, 3), 100.0).unwrap();
        let surface = display_surface(&terrain, &field);
        assert_relative_eq!(surface.get(3, 3), 2.5);
        assert_relative_eq!(surface.get(0, 0), 2.0);
    }

    #[test]
    fn test_first_frame_surface_is_finite() {
        let terrain = flat_terrain(100);
        let mut params = reference_params();
        params.duration = 0.15; // exactly one step

        let state = RunState::new();
        let mut checked = false;
        run_simulation(&params, &terrain, &state, |_, surface, _| {
            assert!(surface.as_slice().iter().all(|v| v.is_finite()));
            checked = true;
        })
        .unwrap();
        assert!(checked);
    }
}

//! End-to-end tests of the ingest, resample and simulation pipeline
//!
//! These tests run the full chain a frontend would: synthesize or fall
//! back to an elevation grid, resample it to the simulation resolution
//! and drive a preset run frame by frame.

use blast_sim_core::grid::ingest::{ingest_elevation, IngestConfig, RasterBand};
use blast_sim_core::grid::terrain::CoordinateMesh;
use blast_sim_core::grid::{resample_terrain, ElevationGrid, GeoBounds};
use blast_sim_core::simulation::scenario::{location, BlastPreset};
use blast_sim_core::{run_simulation, ResampledTerrain, RunState, SimulationParameters, SIM_GRID_SIZE};

/// Build the terrain a frontend gets when no raster is available
fn flat_fallback() -> ResampledTerrain {
    let bounds = GeoBounds::unit();
    let grid = ElevationGrid::flat(SIM_GRID_SIZE, SIM_GRID_SIZE, bounds);
    let mesh = CoordinateMesh::from_bounds(bounds, SIM_GRID_SIZE, SIM_GRID_SIZE);
    resample_terrain(&grid, &mesh, SIM_GRID_SIZE, SIM_GRID_SIZE).unwrap()
}

/// A synthetic elevation raster with a north-south ridge
fn ridge_band(rows: usize, cols: usize) -> RasterBand {
    let mut data = Vec::with_capacity(rows * cols);
    for _ in 0..rows {
        for j in 0..cols {
            let d = (j as f32 - cols as f32 / 2.0).abs();
            data.push(2000.0 - d * 40.0);
        }
    }
    RasterBand {
        data,
        rows,
        cols,
        bounds: GeoBounds::new(-92.0, -88.0, 18.0, 13.0),
        nodata: None,
    }
}

#[test]
fn test_little_boy_over_flat_terrain() {
    let terrain = flat_fallback();
    let origin = location("Guatemala").unwrap();
    let params = SimulationParameters::from_preset(&BlastPreset::little_boy(), origin);

    let state = RunState::new();
    let mut frames = 0_usize;
    let mut last_total = 0.0_f64;
    let summary = run_simulation(&params, &terrain, &state, |_, _, field| {
        frames += 1;
        last_total = field.total();
    })
    .unwrap();

    assert_eq!(frames, params.step_count());
    assert!(!summary.cancelled);
    // Seed far from the boundary: total intensity stays near I0
    assert!((last_total - 1500.0).abs() / 1500.0 < 0.05);
    assert!(summary.peak_intensity > 0.0);
    assert!(summary.peak_intensity <= 1500.0);
}

#[test]
fn test_ingested_terrain_feeds_simulation() {
    let band = ridge_band(120, 160);
    let config = IngestConfig::default();
    let elevation = ingest_elevation(&band, &config).unwrap();

    // Half resolution then a 270-degree rotation swaps the axes
    assert_eq!((elevation.rows(), elevation.cols()), (80, 60));

    let mesh = CoordinateMesh::from_bounds(elevation.bounds(), elevation.rows(), elevation.cols());
    let terrain =
        resample_terrain(&elevation, &mesh, SIM_GRID_SIZE, SIM_GRID_SIZE).unwrap();
    assert_eq!(terrain.rows(), SIM_GRID_SIZE);

    let mut params = SimulationParameters::from_preset(&BlastPreset::fat_man(), (25, 25));
    params.duration = 3.0; // 20 frames is enough for a smoke run

    let state = RunState::new();
    let mut surface_exceeded_terrain = false;
    let summary = run_simulation(&params, &terrain, &state, |_, surface, _| {
        // The wave contribution must show up on top of the terrain
        for (s, t) in surface.as_slice().iter().zip(terrain.height.as_slice()) {
            if s > t {
                surface_exceeded_terrain = true;
            }
        }
    })
    .unwrap();

    assert_eq!(summary.steps_completed, 20);
    assert!(surface_exceeded_terrain);
}

#[test]
fn test_every_department_is_a_valid_origin() {
    let terrain = flat_fallback();
    let preset = BlastPreset::little_boy();

    for (_, origin) in blast_sim_core::simulation::location_coordinates() {
        let mut params = SimulationParameters::from_preset(&preset, origin);
        params.duration = 0.3; // 2 frames per department

        let state = RunState::new();
        let summary = run_simulation(&params, &terrain, &state, |_, _, _| {}).unwrap();
        assert_eq!(summary.steps_completed, 2);
    }
}

#[test]
fn test_cancellation_from_another_thread() {
    let terrain = flat_fallback();
    // Long run so the canceller fires mid-flight
    let params = SimulationParameters::from_preset(&BlastPreset::tsar_bomba(), (25, 25));

    let state = RunState::new();
    let canceller = state.clone();
    let handle = std::thread::spawn(move || canceller.cancel());

    let summary = run_simulation(&params, &terrain, &state, |_, _, _| {}).unwrap();
    handle.join().unwrap();

    // Either outcome is a clean stop; never a hang or panic
    assert!(summary.steps_completed <= params.step_count());
    if summary.cancelled {
        assert!(summary.steps_completed < params.step_count());
    }
}

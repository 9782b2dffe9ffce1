//! Blast Wave Simulation Core Library
//!
//! Simulates the spread of a blast wave over real terrain as 2D
//! diffusion of an intensity field on a fixed grid. Elevation rasters
//! are ingested and aligned to the simulation resolution (`grid`); the
//! explicit finite-difference stepper and the frame loop live in
//! `simulation`.
//!
//! A typical run:
//! 1. load or fall back to flat terrain (`grid::ingest`),
//! 2. resample it to the simulation grid (`grid::resample`),
//! 3. pick a preset and target (`simulation::scenario`),
//! 4. drive frames through `simulation::run_simulation`.

pub mod error;
pub mod grid;
pub mod simulation;

// Re-export main types
pub use error::SimError;
pub use grid::{ElevationGrid, GeoBounds, IngestConfig, ResampledTerrain};
pub use simulation::{
    run_simulation, BlastPreset, DiffusionParams, RunState, RunSummary, ScalarField,
    SimulationParameters, SIM_GRID_SIZE,
};

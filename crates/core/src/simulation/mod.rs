//! Blast-wave simulation
//!
//! The intensity field (`field`), the explicit diffusion stepper
//! (`diffusion`), scenario presets and target locations (`scenario`)
//! and the frame loop that ties them together (`runner`).

pub mod diffusion;
pub mod field;
pub mod runner;
pub mod scenario;

// Re-export main types
pub use diffusion::{diffusion_step, DiffusionParams};
pub use field::ScalarField;
pub use runner::{
    display_surface, run_simulation, RunState, RunSummary, SimulationParameters, SIM_GRID_SIZE,
};
pub use scenario::{location, location_coordinates, BlastPreset};

//! Terrain ingest and alignment
//!
//! Everything between the raw raster and the simulation loop: the
//! ingest pipeline (`ingest`), the terrain data model (`terrain`) and
//! bilinear resampling to the simulation resolution (`resample`).

pub mod ingest;
pub mod resample;
pub mod terrain;

// Re-export main types
pub use ingest::{ingest_elevation, load_elevation, scale_height, IngestConfig, RasterBand};
pub use resample::resample_terrain;
pub use terrain::{CoordinateMesh, ElevationGrid, GeoBounds, ResampledTerrain};

use blast_sim_core::simulation::{location, location_coordinates, BlastPreset};
use blast_sim_core::{
    grid, run_simulation, ElevationGrid, GeoBounds, IngestConfig, ResampledTerrain, RunState,
    SimulationParameters, SIM_GRID_SIZE,
};
use clap::Parser;
use std::path::Path;

/// Blast wave simulation demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "blast-sim-demo")]
#[command(about = "Terrain blast wave diffusion demo", long_about = None)]
struct Args {
    /// Blast preset (little-boy, fat-man, castle-bravo, tsar-bomba)
    #[arg(short, long, default_value = "little-boy")]
    preset: String,

    /// Target department (e.g. "Guatemala", "Petén"); see --list-locations
    #[arg(short, long, default_value = "Guatemala")]
    location: String,

    /// Custom target row, overrides --location when paired with --col
    #[arg(long)]
    row: Option<usize>,

    /// Custom target column, overrides --location when paired with --row
    #[arg(long)]
    col: Option<usize>,

    /// Elevation raster path (omit for flat terrain)
    #[arg(short, long)]
    terrain: Option<String>,

    /// Simulation grid side length
    #[arg(short, long, default_value_t = SIM_GRID_SIZE)]
    grid_size: usize,

    /// Override the preset's simulated duration in seconds
    #[arg(short, long)]
    duration: Option<f32>,

    /// Time step (stability requires D*dt*(1/dx^2 + 1/dy^2) <= 0.5)
    #[arg(long, default_value_t = 0.15)]
    dt: f32,

    /// Diffusion coefficient
    #[arg(long, default_value_t = 1.0)]
    diffusion: f32,

    /// Print a report row every N frames
    #[arg(short, long, default_value_t = 10)]
    report_interval: usize,

    /// List available presets and target locations, then exit
    #[arg(long)]
    list_locations: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run(&Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.list_locations {
        print_tables();
        return Ok(());
    }

    println!("=== Blast Wave Simulation Demo ===\n");

    let mut preset = BlastPreset::by_name(&args.preset)
        .ok_or_else(|| format!("unknown preset '{}'", args.preset))?;
    if let Some(duration) = args.duration {
        preset.duration = duration;
    }

    let origin = if let (Some(row), Some(col)) = (args.row, args.col) {
        (row, col)
    } else {
        location(&args.location).ok_or_else(|| format!("unknown location '{}'", args.location))?
    };

    let terrain = load_terrain(args)?;
    println!(
        "Terrain: {}x{} grid{}",
        terrain.rows(),
        terrain.cols(),
        if args.terrain.is_some() { "" } else { " (flat fallback)" }
    );

    let mut params = SimulationParameters::from_preset(&preset, origin);
    params.dt = args.dt;
    params.diffusion = args.diffusion;
    if !params.diffusion_params().is_stable() {
        eprintln!(
            "warning: stability number {:.3} exceeds 0.5; output will diverge",
            params.diffusion_params().stability_number()
        );
    }
    println!("Preset: {} (I0 = {}, T = {}s)", preset.name, preset.initial_intensity, preset.duration);
    println!("Target: ({}, {})", origin.0, origin.1);
    println!("Steps: {} at dt = {}\n", params.step_count(), params.dt);

    println!("Frame | Peak Intensity | Total Intensity | Surface Max");
    println!("------|----------------|-----------------|------------");

    let state = RunState::new();
    let interval = args.report_interval.max(1);
    let summary = run_simulation(&params, &terrain, &state, |step, surface, field| {
        if step % interval == 0 {
            let surface_max = surface
                .as_slice()
                .iter()
                .filter(|v| !v.is_nan())
                .fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            println!(
                "{:5} | {:14.3} | {:15.3} | {:11.4}",
                step,
                field.max(),
                field.total(),
                surface_max
            );
        }
    })?;

    println!("\n=== Simulation Complete ===");
    println!("Frames rendered: {}", summary.steps_completed);
    println!("Cancelled: {}", summary.cancelled);
    println!("Peak intensity: {:.3}", summary.peak_intensity);

    Ok(())
}

/// Ingest and resample the raster, or fall back to flat terrain when no
/// path was given or the source cannot be read
fn load_terrain(args: &Args) -> Result<ResampledTerrain, Box<dyn std::error::Error>> {
    let size = args.grid_size;
    let config = IngestConfig::default();

    let elevation = match &args.terrain {
        Some(path) => match grid::load_elevation(Path::new(path), &config) {
            Ok(grid) => grid,
            Err(e) => {
                eprintln!("warning: could not load '{path}': {e}; using flat terrain");
                ElevationGrid::flat(size, size, GeoBounds::unit())
            }
        },
        None => ElevationGrid::flat(size, size, GeoBounds::unit()),
    };

    let mesh = grid::terrain::CoordinateMesh::from_bounds(
        elevation.bounds(),
        elevation.rows(),
        elevation.cols(),
    );
    Ok(grid::resample_terrain(&elevation, &mesh, size, size)?)
}

fn print_tables() {
    println!("Presets:");
    for preset in BlastPreset::all() {
        println!(
            "  {:32} I0 = {:9}, T = {}s",
            preset.name, preset.initial_intensity, preset.duration
        );
    }

    println!("\nLocations:");
    let table = location_coordinates();
    let mut names: Vec<_> = table.keys().collect();
    names.sort_unstable();
    for name in names {
        let (row, col) = table[name];
        println!("  {name:16} ({row}, {col})");
    }
}

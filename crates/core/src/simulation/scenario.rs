//! Scenario configuration data
//!
//! Blast presets pair an initial intensity with a simulated duration;
//! the location table maps the 22 Guatemalan departments to simulation
//! grid coordinates. A UI or CLI selects from these tables, or supplies
//! custom in-bounds coordinates directly.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A named blast scenario: initial intensity and simulated duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlastPreset {
    /// Display name
    pub name: String,
    /// Intensity seeded at the origin cell (I0)
    pub initial_intensity: f32,
    /// Total simulated duration in seconds (T)
    pub duration: f32,
}

impl BlastPreset {
    /// ~15 kt yield, 20 second simulation
    pub fn little_boy() -> Self {
        BlastPreset {
            name: "Little Boy (Hiroshima) (15 kt)".to_string(),
            initial_intensity: 1500.0,
            duration: 20.0,
        }
    }

    /// ~21 kt yield, 30 second simulation
    pub fn fat_man() -> Self {
        BlastPreset {
            name: "Fat Man (Nagasaki) (21 kt)".to_string(),
            initial_intensity: 2100.0,
            duration: 30.0,
        }
    }

    /// ~15,000 kt yield, 2 minute simulation
    pub fn castle_bravo() -> Self {
        BlastPreset {
            name: "Castle Bravo (15,000 kt)".to_string(),
            initial_intensity: 150000.0,
            duration: 120.0,
        }
    }

    /// ~50,000 kt yield, 5 minute simulation
    pub fn tsar_bomba() -> Self {
        BlastPreset {
            name: "Tsar Bomba (50,000 kt)".to_string(),
            initial_intensity: 500000.0,
            duration: 300.0,
        }
    }

    /// Every built-in preset
    pub fn all() -> Vec<BlastPreset> {
        vec![
            BlastPreset::little_boy(),
            BlastPreset::fat_man(),
            BlastPreset::castle_bravo(),
            BlastPreset::tsar_bomba(),
        ]
    }

    /// Look up a preset by a case-insensitive name fragment
    ///
    /// `"hiroshima"`, `"little-boy"` and `"Little Boy"` all resolve to
    /// the same preset.
    pub fn by_name(name: &str) -> Option<BlastPreset> {
        let wanted = name.to_lowercase().replace(['-', '_'], " ");
        BlastPreset::all()
            .into_iter()
            .find(|p| p.name.to_lowercase().contains(&wanted))
    }
}

/// Simulation grid coordinates for the 22 Guatemalan departments
///
/// Custom targets bypass this table: any integer pair inside the grid
/// is a valid origin.
pub fn location_coordinates() -> FxHashMap<&'static str, (usize, usize)> {
    let mut map = FxHashMap::default();
    map.insert("Guatemala", (25, 25));
    map.insert("Huehuetenango", (10, 10));
    map.insert("Quiché", (15, 12));
    map.insert("Alta Verapaz", (18, 20));
    map.insert("Baja Verapaz", (22, 18));
    map.insert("Chimaltenango", (24, 22));
    map.insert("Chiquimula", (30, 35));
    map.insert("El Progreso", (27, 24));
    map.insert("Escuintla", (35, 20));
    map.insert("Izabal", (32, 40));
    map.insert("Jalapa", (28, 30));
    map.insert("Jutiapa", (34, 28));
    map.insert("Petén", (5, 40));
    map.insert("Quetzaltenango", (12, 15));
    map.insert("Retalhuleu", (15, 8));
    map.insert("Sacatepéquez", (26, 23));
    map.insert("San Marcos", (10, 5));
    map.insert("Santa Rosa", (30, 20));
    map.insert("Sololá", (18, 15));
    map.insert("Suchitepéquez", (20, 10));
    map.insert("Totonicapán", (14, 14));
    map.insert("Zacapa", (28, 38));
    map
}

/// Case-insensitive lookup into the location table
pub fn location(name: &str) -> Option<(usize, usize)> {
    let wanted = name.to_lowercase();
    location_coordinates()
        .iter()
        .find(|(k, _)| k.to_lowercase() == wanted)
        .map(|(_, &coords)| coords)
}

//! Error taxonomy for the simulation core
//!
//! Three failure classes cross the public API boundary:
//! - `DataSource`: the elevation raster could not be opened or read.
//!   Callers recover by substituting flat terrain; this is never fatal.
//! - `Shape`: a grid with degenerate or mismatched dimensions reached a
//!   pipeline stage that cannot operate on it.
//! - `OutOfBounds`: the requested blast origin lies outside the
//!   simulation grid. Raised before any stepping begins.
//!
//! Numerical divergence from violating the explicit-scheme stability
//! bound is deliberately NOT an error: it is documented as
//! undefined-quality output (see `DiffusionParams::is_stable`).

/// Errors surfaced by the simulation core
#[derive(Debug)]
pub enum SimError {
    /// Elevation raster unreadable or missing
    DataSource(String),
    /// Degenerate or mismatched grid dimensions
    Shape {
        /// Pipeline stage that rejected the grid
        context: &'static str,
        /// Offending row count
        rows: usize,
        /// Offending column count
        cols: usize,
    },
    /// Blast origin outside the simulation grid
    OutOfBounds {
        /// Requested origin row
        x: usize,
        /// Requested origin column
        y: usize,
        /// Grid row count
        rows: usize,
        /// Grid column count
        cols: usize,
    },
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::DataSource(msg) => write!(f, "Failed to read elevation source: {msg}"),
            SimError::Shape { context, rows, cols } => {
                write!(f, "Invalid grid shape {rows}x{cols} in {context}")
            }
            SimError::OutOfBounds { x, y, rows, cols } => {
                write!(f, "Origin ({x}, {y}) outside {rows}x{cols} grid")
            }
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = SimError::DataSource("no such file".to_string());
        assert!(e.to_string().contains("no such file"));

        let e = SimError::Shape { context: "resample source", rows: 0, cols: 10 };
        assert!(e.to_string().contains("0x10"));

        let e = SimError::OutOfBounds { x: 120, y: 5, rows: 100, cols: 100 };
        assert!(e.to_string().contains("(120, 5)"));
        assert!(e.to_string().contains("100x100"));
    }
}

//! Bilinear grid resampling
//!
//! Resizes the ingested elevation grid and both coordinate mesh
//! components to the fixed simulation resolution. Uses order-1
//! (bilinear) interpolation with align-corners source mapping
//! `src = i * (in - 1) / (out - 1)`, so corner cells map to corner
//! cells and row 0 stays geographically "top".
//!
//! NaN sentinel cells are not special-cased: a sentinel corner makes
//! the interpolated output NaN, which downstream code renders as a gap.

use crate::error::SimError;
use crate::grid::terrain::{CoordinateMesh, ElevationGrid, ResampledTerrain};
use crate::simulation::ScalarField;

/// Resize a row-major grid to a new shape with bilinear interpolation
///
/// Both source and target shapes must be non-degenerate; callers check.
pub(crate) fn resize_bilinear(
    data: &[f32],
    rows: usize,
    cols: usize,
    out_rows: usize,
    out_cols: usize,
) -> Vec<f32> {
    let row_scale = if out_rows > 1 {
        (rows - 1) as f32 / (out_rows - 1) as f32
    } else {
        0.0
    };
    let col_scale = if out_cols > 1 {
        (cols - 1) as f32 / (out_cols - 1) as f32
    } else {
        0.0
    };

    let mut out = Vec::with_capacity(out_rows * out_cols);
    for i in 0..out_rows {
        let gr = i as f32 * row_scale;
        let r0 = (gr.floor() as usize).min(rows.saturating_sub(2));
        let r1 = (r0 + 1).min(rows - 1);
        let fr = gr - r0 as f32;

        for j in 0..out_cols {
            let gc = j as f32 * col_scale;
            let c0 = (gc.floor() as usize).min(cols.saturating_sub(2));
            let c1 = (c0 + 1).min(cols - 1);
            let fc = gc - c0 as f32;

            let v00 = data[r0 * cols + c0];
            let v01 = data[r0 * cols + c1];
            let v10 = data[r1 * cols + c0];
            let v11 = data[r1 * cols + c1];

            let top = v00 * (1.0 - fc) + v01 * fc;
            let bottom = v10 * (1.0 - fc) + v11 * fc;
            out.push(top * (1.0 - fr) + bottom * fr);
        }
    }
    out
}

/// Resize the elevation grid and its coordinate mesh to the simulation
/// resolution
///
/// The grid and mesh components are interpolated independently; the
/// result is read-only for the duration of a simulation run.
///
/// # Errors
/// Returns `SimError::Shape` if the source grid has zero rows or
/// columns, if the target shape is degenerate, or if the mesh shape
/// does not match the grid shape. Callers must substitute a flat
/// default rather than proceed with a degenerate grid.
pub fn resample_terrain(
    grid: &ElevationGrid,
    mesh: &CoordinateMesh,
    target_rows: usize,
    target_cols: usize,
) -> Result<ResampledTerrain, SimError> {
    if grid.rows() == 0 || grid.cols() == 0 {
        return Err(SimError::Shape {
            context: "resample source",
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }
    if target_rows == 0 || target_cols == 0 {
        return Err(SimError::Shape {
            context: "resample target",
            rows: target_rows,
            cols: target_cols,
        });
    }
    if mesh.rows() != grid.rows() || mesh.cols() != grid.cols() {
        return Err(SimError::Shape {
            context: "resample mesh",
            rows: mesh.rows(),
            cols: mesh.cols(),
        });
    }

    let height = resize_bilinear(
        grid.as_slice(),
        grid.rows(),
        grid.cols(),
        target_rows,
        target_cols,
    );
    let x = resize_bilinear(
        mesh.x_slice(),
        mesh.rows(),
        mesh.cols(),
        target_rows,
        target_cols,
    );
    let y = resize_bilinear(
        mesh.y_slice(),
        mesh.rows(),
        mesh.cols(),
        target_rows,
        target_cols,
    );

    Ok(ResampledTerrain {
        height: ScalarField::from_data(height, target_rows, target_cols)?,
        mesh: CoordinateMesh::from_components(x, y, target_rows, target_cols)?,
    })
}

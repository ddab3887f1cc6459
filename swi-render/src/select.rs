use crate::bounds::GeoBounds;
use swi_mesh::{InferredSpacing, Mesh};

/// The rectangle a mesh covers: its center ± half the grid interval.
pub fn cell_bounds(mesh: &Mesh, spacing: &InferredSpacing) -> GeoBounds {
    GeoBounds {
        south: mesh.lat - spacing.half_lat(),
        west: mesh.lon - spacing.half_lon(),
        north: mesh.lat + spacing.half_lat(),
        east: mesh.lon + spacing.half_lon(),
    }
}

/// Meshes whose cell rectangle intersects `viewport`, in input order.
///
/// The test is on the whole cell, not the center, so a cell straddling a
/// tile edge is selected by both tiles. Lazy; nothing is allocated.
pub fn select_visible<'a>(
    meshes: &'a [Mesh],
    spacing: &InferredSpacing,
    viewport: &GeoBounds,
) -> impl Iterator<Item = &'a Mesh> + 'a {
    let spacing = *spacing;
    let viewport = *viewport;
    meshes
        .iter()
        .filter(move |mesh| cell_bounds(mesh, &spacing).intersects(&viewport))
}

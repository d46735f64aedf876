//! Mesh builders for the plotting operations: trajectories, color-mapped
//! surfaces, and the 2D colorbar legend.

use glam::Vec3;
use itertools::Itertools;

use crate::colormap::{self, Colormap};
use crate::rendering::mesh::MeshData;

/// Polyline through `points` as a uniformly colored line list.
pub fn trajectory_mesh(points: &[Vec3], color: Vec3) -> MeshData {
    let mut mesh = MeshData::lines();
    for (a, b) in points.iter().tuple_windows() {
        mesh.positions.push(*a);
        mesh.positions.push(*b);
        mesh.colors.push(color);
        mesh.colors.push(color);
    }
    mesh
}

/// Triangle soup with per-vertex colors taken from `map` by mapping each
/// vertex's `values` entry linearly into [min, max].
///
/// Triangles referencing out-of-range vertex indices are skipped with a
/// warning; a missing value entry colors its vertex as `min`.
pub fn surface_mesh(
    vertices: &[Vec3],
    values: &[f64],
    triangles: &[[u32; 3]],
    min: f64,
    max: f64,
    map: Colormap,
) -> MeshData {
    let mut mesh = MeshData::triangles();
    for triangle in triangles {
        if triangle.iter().any(|&i| i as usize >= vertices.len()) {
            log::warn!("surface triangle {triangle:?} references a missing vertex, skipping");
            continue;
        }
        for &index in triangle {
            let index = index as usize;
            let value = values.get(index).copied().unwrap_or(min);
            mesh.positions.push(vertices[index]);
            mesh.colors
                .push(map.sample_index(colormap::map_to_index(value, min, max)));
        }
    }
    mesh
}

/// Vertical gradient bar for the 2D overlay, built from ten evenly spaced
/// samples of the map (nine graded bands), sized for the fixed 10x10
/// orthographic view.
pub fn colorbar_mesh(map: Colormap) -> MeshData {
    const SAMPLES: usize = 10;
    let color_at =
        |sample: usize| map.sample_index(sample * (colormap::TABLE_SIZE - 1) / (SAMPLES - 1));

    let mut mesh = MeshData::triangles();
    for band in 0..SAMPLES - 1 {
        let y0 = 0.5 * (band as f32 - 1.0);
        let y1 = 0.5 * band as f32;
        let (bottom, top) = (color_at(band), color_at(band + 1));
        let corners = [
            (Vec3::new(0.0, y0, 0.0), bottom),
            (Vec3::new(0.5, y0, 0.0), bottom),
            (Vec3::new(0.5, y1, 0.0), top),
            (Vec3::new(0.0, y0, 0.0), bottom),
            (Vec3::new(0.5, y1, 0.0), top),
            (Vec3::new(0.0, y1, 0.0), top),
        ];
        for (position, color) in corners {
            mesh.positions.push(position);
            mesh.colors.push(color);
        }
    }
    mesh
}

use anyhow::Result;
use glam::{Mat4, Vec3};
use sciviz::{App, Colormap};

const GRID: usize = 64;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let mut app = App::new();

    // Height field z = sinc(r) over a regular grid, colored by height.
    let mut vertices = Vec::with_capacity(GRID * GRID);
    let mut values = Vec::with_capacity(GRID * GRID);
    for row in 0..GRID {
        for column in 0..GRID {
            let x = 8.0 * (column as f32 / (GRID - 1) as f32 - 0.5);
            let y = 8.0 * (row as f32 / (GRID - 1) as f32 - 0.5);
            let r = (x * x + y * y).sqrt();
            let z = if r < f32::EPSILON { 1.0 } else { r.sin() / r };
            vertices.push(Vec3::new(x, y, z));
            values.push(z as f64);
        }
    }

    let mut triangles = Vec::new();
    for row in 0..GRID - 1 {
        for column in 0..GRID - 1 {
            let corner = (row * GRID + column) as u32;
            let next_row = corner + GRID as u32;
            triangles.push([corner, corner + 1, next_row + 1]);
            triangles.push([corner, next_row + 1, next_row]);
        }
    }

    app.set_background("white")
        .surface(&vertices, &values, &triangles, -0.25, 1.0, Colormap::Turbo)
        .set_transformation(Mat4::from_scale(Vec3::splat(0.8)));

    app.run()
}

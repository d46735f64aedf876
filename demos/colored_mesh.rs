use anyhow::Result;
use glam::{Mat4, Vec3};
use rand::Rng;
use sciviz::{App, Colormap, Primitive};

const GRID: usize = 48;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let mut app = App::new();
    let mut rng = rand::thread_rng();

    // A bumpy grid with a random scalar field, in the style of a FEM result
    // plot.
    let mut vertices = Vec::with_capacity(GRID * GRID);
    let mut values = Vec::with_capacity(GRID * GRID);
    for row in 0..GRID {
        for column in 0..GRID {
            let x = 40.0 * (column as f32 / (GRID - 1) as f32 - 0.5);
            let y = 40.0 * (row as f32 / (GRID - 1) as f32 - 0.5);
            let z = (0.3 * x).sin() * (0.3 * y).cos() * 4.0;
            vertices.push(Vec3::new(x, y, z));
            values.push(rng.gen_range(-1.0..1.0));
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

    app.surface(&vertices, &values, &triangles, -1.0, 1.0, Colormap::Viridis);

    app.add_primitive(Primitive::Cube)
        .set_transformation(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));

    // Scale everything down at once through the root.
    app.manipulator()
        .add_prior_transformation(Mat4::from_scale(Vec3::splat(0.05)));

    app.camera_mut()
        .set_center(Vec3::ZERO)
        .set_pose(Vec3::new(10.0, 0.0, 5.0));

    app.run()
}

use std::f32::consts::TAU;

use anyhow::Result;
use glam::Vec3;
use sciviz::App;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let mut app = App::new();

    // Helix around the Z axis, shifted a little off-center.
    let points: Vec<Vec3> = (0..=500)
        .map(|i| {
            let t = i as f32 / 500.0;
            let angle = 4.0 * TAU * t;
            Vec3::new(angle.cos() + 0.5, angle.sin(), 2.0 * t - 1.0)
        })
        .collect();

    app.trajectory(&points, "red");

    app.run()
}

use anyhow::Result;
use glam::{Mat4, Vec3};
use sciviz::{color, App, Primitive};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let mut app = App::new();

    app.add_primitive(Primitive::Cube)
        .add_prior_transformation(Mat4::IDENTITY)
        .set_color(color::by_name("red").unwrap())
        .set_transformation(Mat4::from_translation(Vec3::new(-2.0, 0.0, 0.0)));

    app.add_primitive(Primitive::Cube)
        .add_prior_transformation(Mat4::from_scale(Vec3::splat(0.5)))
        .set_color(color::by_name("green").unwrap())
        .set_transformation(Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)));

    app.run()
}

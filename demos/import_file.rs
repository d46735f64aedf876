use anyhow::Result;
use sciviz::App;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let path = std::env::args()
        .nth(1)
        .expect("usage: import_file <scene.gltf>");

    let mut app = App::new();

    app.import(&path);
    app.add_frame();

    app.run()
}

use anyhow::Result;
use sciviz::{App, Colormap};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let mut app = App::new();

    app.colorbar(0.0, 1.0, Colormap::Turbo);

    app.run()
}

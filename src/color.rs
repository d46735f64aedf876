//! Named colors for the string-based plotting API.

use glam::Vec4;

pub const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

pub fn by_name(name: &str) -> Option<Vec4> {
    let rgb = match name {
        "red" => [1.0, 0.0, 0.0],
        "green" => [0.0, 1.0, 0.0],
        "blue" => [0.0, 0.0, 1.0],
        "cyan" => [0.0, 1.0, 1.0],
        "magenta" => [1.0, 0.0, 1.0],
        "yellow" => [1.0, 1.0, 0.0],
        "white" => [1.0, 1.0, 1.0],
        "grey" | "gray" => [0.345, 0.345, 0.345],
        "black" => [0.0, 0.0, 0.0],
        _ => return None,
    };
    Some(Vec4::new(rgb[0], rgb[1], rgb[2], 1.0))
}

/// Looks up a color by name, falling back to white (with a warning) for
/// names the palette does not know.
pub fn named_or_white(name: &str) -> Vec4 {
    by_name(name).unwrap_or_else(|| {
        log::warn!("color `{name}` not found, using white");
        WHITE
    })
}

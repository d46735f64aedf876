use sciviz::colormap::{map_to_index, Colormap, TABLE_SIZE};

#[test]
fn sample_clamps_outside_unit_range() {
    for map in [
        Colormap::Turbo,
        Colormap::Viridis,
        Colormap::Magma,
        Colormap::Plasma,
        Colormap::Inferno,
    ] {
        assert_eq!(map.sample(-1.0), map.sample(0.0));
        assert_eq!(map.sample(2.0), map.sample(1.0));
    }
}

#[test]
fn table_endpoints_match_samples() {
    let map = Colormap::Viridis;
    assert_eq!(map.sample_index(0), map.sample(0.0));
    assert_eq!(map.sample_index(TABLE_SIZE - 1), map.sample(1.0));
    // Out-of-range indices saturate
    assert_eq!(map.sample_index(usize::MAX), map.sample(1.0));
}

#[test]
fn map_to_index_is_linear_and_clamped() {
    assert_eq!(map_to_index(0.0, 0.0, 1.0), 0);
    assert_eq!(map_to_index(1.0, 0.0, 1.0), TABLE_SIZE - 1);
    assert_eq!(map_to_index(-5.0, 0.0, 1.0), 0);
    assert_eq!(map_to_index(5.0, 0.0, 1.0), TABLE_SIZE - 1);
    assert_eq!(map_to_index(0.5, 0.0, 1.0), 128);
}

#[test]
fn degenerate_range_maps_to_zero() {
    assert_eq!(map_to_index(0.3, 1.0, 1.0), 0);
    assert_eq!(map_to_index(0.3, 2.0, 1.0), 0);
}

#[test]
fn colormaps_resolve_by_name() {
    assert_eq!(Colormap::by_name("turbo"), Some(Colormap::Turbo));
    assert_eq!(Colormap::by_name("viridis"), Some(Colormap::Viridis));
    assert_eq!(Colormap::by_name("jet"), None);
}

#[test]
fn unknown_color_names_fall_back_to_white() {
    assert_eq!(sciviz::color::by_name("turquoiseish"), None);
    assert_eq!(
        sciviz::color::named_or_white("turquoiseish"),
        glam::Vec4::ONE
    );
    assert_eq!(
        sciviz::color::by_name("red").unwrap(),
        glam::Vec4::new(1.0, 0.0, 0.0, 1.0)
    );
}

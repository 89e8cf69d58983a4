use chainweave_core::constants::{MAX_ZOOM, MIN_ZOOM};
use chainweave_designer::bounds::Bounds;
use chainweave_designer::lattice::{CellKey, HexLattice};
use chainweave_designer::viewport::Viewport;
use glam::DVec2;
use proptest::prelude::*;

#[test]
fn test_viewport_creation() {
    let vp = Viewport::new(1200.0, 800.0);
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.view().pan(), DVec2::ZERO);
    assert!(vp.is_ready());
    assert!((vp.aspect() - 1.5).abs() < 1e-12);
}

#[test]
fn test_screen_right_is_logical_right() {
    let vp = Viewport::new(1200.0, 800.0);
    let a = vp.screen_to_logical(DVec2::new(600.0, 400.0));
    let b = vp.screen_to_logical(DVec2::new(700.0, 400.0));
    assert!(b.x > a.x);
    assert!((b.y - a.y).abs() < 1e-9);
}

#[test]
fn test_zoom_in_brings_camera_closer() {
    let mut vp = Viewport::new(1200.0, 800.0);
    let far = vp.camera_distance();
    vp.view_mut().set_zoom(2.0);
    assert!((vp.camera_distance() - far / 2.0).abs() < 1e-9);
    assert_eq!(vp.camera_snapshot().distance, vp.camera_distance());
}

#[test]
fn test_screen_to_cell_picks_ring_under_cursor() {
    let lattice = HexLattice::new(8.0);
    let vp = Viewport::new(1200.0, 800.0);
    let key = CellKey::new(3, -2);
    let screen = vp.logical_to_screen(lattice.cell_to_logical(key));
    assert_eq!(vp.screen_to_cell(screen, &lattice), key);
    assert_eq!(vp.screen_to_cell(screen + DVec2::new(1.0, 1.0), &lattice), key);
}

#[test]
fn test_frame_bounds_fits_every_corner() {
    let mut vp = Viewport::new(1000.0, 500.0);
    let bounds = Bounds::from_corners(DVec2::new(400.0, -50.0), DVec2::new(900.0, 300.0));
    vp.frame_bounds(&bounds);
    assert_eq!(vp.view().origin(), bounds.center());
    for corner in [bounds.min, bounds.max, DVec2::new(bounds.min.x, bounds.max.y)] {
        let s = vp.logical_to_screen(corner);
        assert!(s.x >= 0.0 && s.x <= 1000.0, "x {}", s.x);
        assert!(s.y >= 0.0 && s.y <= 500.0, "y {}", s.y);
    }
}

#[test]
fn test_display_summary() {
    let vp = Viewport::new(1200.0, 800.0);
    assert!(vp.to_string().starts_with("Zoom: 1.00x"));
}

proptest! {
    #[test]
    fn prop_screen_logical_round_trip(
        sx in 0.0f64..1200.0,
        sy in 0.0f64..800.0,
        zoom in MIN_ZOOM..=MAX_ZOOM,
        px in -500.0f64..500.0,
        py in -500.0f64..500.0,
        ox in -100_000.0f64..100_000.0,
        oy in -100_000.0f64..100_000.0,
        recenter in any::<bool>(),
    ) {
        let mut vp = Viewport::new(1200.0, 800.0);
        vp.view_mut().set_zoom(zoom);
        prop_assert_eq!(vp.zoom(), zoom);
        vp.view_mut().set_pan(DVec2::new(px, py));
        if recenter {
            vp.view_mut().recenter(DVec2::new(ox, oy));
        } else {
            vp.view_mut().rebase_origin(DVec2::new(ox, oy));
        }
        let screen = DVec2::new(sx, sy);
        let back = vp.logical_to_screen(vp.screen_to_logical(screen));
        prop_assert!(back.distance(screen) < 1e-5, "{:?} -> {:?}", screen, back);
    }

    #[test]
    fn prop_rebase_keeps_pixels_fixed(
        zoom in MIN_ZOOM..=MAX_ZOOM,
        ox in -5000.0f64..5000.0,
        oy in -5000.0f64..5000.0,
        lx in -100.0f64..100.0,
        ly in -100.0f64..100.0,
    ) {
        let mut vp = Viewport::new(1200.0, 800.0);
        vp.view_mut().set_zoom(zoom);
        let logical = DVec2::new(lx, ly);
        let before = vp.logical_to_screen(logical);
        vp.view_mut().rebase_origin(DVec2::new(ox, oy));
        let after = vp.logical_to_screen(logical);
        prop_assert!(before.distance(after) < 1e-6);
    }
}

use std::io::Cursor;

use chainweave_core::OverlayError;
use chainweave_designer::color::HexColor;
use chainweave_designer::lattice::CellKey;
use chainweave_designer::overlay::{decode_overlay, OverlayParams, OverlaySampler};
use chainweave_designer::{DesignerState, OverlayScope};
use glam::{DVec2, DVec3};
use image::{ImageFormat, Rgba, RgbaImage};

/// Left half black, right half white.
fn split_png() -> Vec<u8> {
    let mut img = RgbaImage::new(4, 1);
    for x in 0..4 {
        let v = if x < 2 { 0 } else { 255 };
        img.put_pixel(x, 0, Rgba([v, v, v, 255]));
    }
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn row(n: i32) -> Vec<(CellKey, DVec3)> {
    (0..n)
        .map(|c| (CellKey::new(0, c), DVec3::new(c as f64 * 8.0, 0.0, 0.0)))
        .collect()
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(matches!(
        decode_overlay(&[0x89, b'P', b'N', b'G']),
        Err(OverlayError::Decode { .. })
    ));
}

#[test]
fn test_row_splits_across_image() {
    let img = decode_overlay(&split_png()).unwrap();
    let sampler = OverlaySampler::new(&img, OverlayParams::default()).unwrap();
    let result = sampler.sample(&row(4));
    let colors: Vec<HexColor> = result.updates.iter().map(|(_, c)| *c).collect();
    assert_eq!(
        colors,
        vec![HexColor::BLACK, HexColor::BLACK, HexColor::WHITE, HexColor::WHITE]
    );
}

#[test]
fn test_half_scale_tiles_twice() {
    let img = decode_overlay(&split_png()).unwrap();
    let params = OverlayParams {
        scale: 0.5,
        tile_x: true,
        ..OverlayParams::default()
    };
    let sampler = OverlaySampler::new(&img, params).unwrap();
    let result = sampler.sample(&row(5));
    assert_eq!(result.skipped, 0);
    assert_eq!(result.updates.len(), 5);

    let untiled = OverlayParams {
        scale: 0.5,
        ..OverlayParams::default()
    };
    let sampler = OverlaySampler::new(&img, untiled).unwrap();
    let result = sampler.sample(&row(5));
    assert_eq!(result.skipped, 2);
}

#[test]
fn test_selection_scope_only_touches_selected_rings() {
    let mut state = DesignerState::new();
    state.set_active_color(HexColor::new(255, 0, 0));
    for c in 0..4 {
        state.paint_cell(CellKey::new(0, c));
    }
    state.set_tool(chainweave_designer::Tool::SelectRect);
    state.set_viewport_size(800.0, 600.0);
    let a = state.viewport().logical_to_screen(DVec2::new(-1.0, -1.0));
    let b = state.viewport().logical_to_screen(DVec2::new(9.0, 1.0));
    state.pointer_down(a);
    state.pointer_up(b);
    assert_eq!(state.selection().last_selection().len(), 2);

    let summary = state
        .apply_overlay(&split_png(), OverlayParams::default(), OverlayScope::Selection)
        .unwrap();
    assert_eq!(summary.recolored, 2);
    assert_eq!(
        state.rings().get(CellKey::new(0, 3)).unwrap().color,
        HexColor::new(255, 0, 0)
    );
}

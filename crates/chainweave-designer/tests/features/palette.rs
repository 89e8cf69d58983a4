use chainweave_designer::calibration::CalibrationTable;
use chainweave_designer::color::HexColor;
use chainweave_designer::lattice::CellKey;
use chainweave_designer::palette::Palette;
use chainweave_designer::DesignerState;

const SHOP_PALETTE: &str = r##"{
    "name": "Shop",
    "colors": [
        {"hex": "#111111", "name": "Black", "supplier": "Acme", "material": "Anodized Al"},
        {"hex": "#C0C0C0", "name": "Silver", "supplier": "Acme", "material": "Bright Al"},
        "#ff8800"
    ]
}"##;

#[test]
fn test_shop_palette_drives_bom_lines() {
    let mut state = DesignerState::new();
    state.load_palette_json(SHOP_PALETTE).unwrap();
    assert_eq!(state.palette().name(), "Shop");
    state.set_active_color(HexColor::new(0xff, 0x80, 0x00));
    state.paint_cell(CellKey::new(0, 0));
    state.set_active_color(HexColor::new(0x10, 0x10, 0x10));
    state.paint_cell(CellKey::new(0, 1));

    let bom = state.bom();
    let lines: Vec<(usize, String, usize)> = bom
        .lines
        .iter()
        .map(|l| (l.index, l.name.clone(), l.count))
        .collect();
    assert_eq!(
        lines,
        vec![(1, "Black".to_string(), 1), (3, "Color 3".to_string(), 1)]
    );
    assert_eq!(bom.lines[0].supplier.as_deref(), Some("Acme"));
}

#[test]
fn test_bad_palette_keeps_current_one() {
    let mut state = DesignerState::new();
    assert!(state.load_palette_json("[]").is_err());
    assert!(state.load_palette_json(r##"["#12345"]"##).is_err());
    assert_eq!(state.palette(), &Palette::default());
}

#[test]
fn test_calibration_changes_display_not_stored_colors() {
    let mut state = DesignerState::new();
    let red = HexColor::new(255, 0, 0);
    let shown = HexColor::new(180, 30, 30);
    state.set_active_color(red);
    state.paint_cell(CellKey::new(0, 0));
    state.set_calibration(Some(CalibrationTable::new("anodized").with_entry(red, shown)));

    assert_eq!(state.render_frame().rings[0].color, shown);
    assert_eq!(state.rings().get(CellKey::new(0, 0)).unwrap().color, red);
    assert_eq!(state.bom().line_for(red).map(|l| l.count), Some(1));

    state.set_calibration(None);
    assert_eq!(state.render_frame().rings[0].color, red);
}

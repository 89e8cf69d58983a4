use std::sync::Arc;

use chainweave_core::EventBus;
use chainweave_designer::bom::{build_bom, BomMode};
use chainweave_designer::calibration::CalibrationContext;
use chainweave_designer::color::HexColor;
use chainweave_designer::export::{
    bom_print_pages, bom_to_csv, build_assembly_map, rings_to_csv, save_assembly_map,
    AssemblyMapOptions, RING_CSV_HEADER,
};
use chainweave_designer::geometry::RingGeometry;
use chainweave_designer::lattice::CellKey;
use chainweave_designer::palette::Palette;
use chainweave_designer::ring_store::RingStore;
use tempfile::tempdir;

fn block(rows: i32, cols: i32) -> RingStore {
    let mut store = RingStore::new();
    for row in 0..rows {
        for col in 0..cols {
            let color = if (row + col) % 2 == 0 {
                HexColor::new(255, 0, 0)
            } else {
                HexColor::new(0, 0, 255)
            };
            store.place(CellKey::new(row, col), color);
        }
    }
    store
}

#[test]
fn test_filled_block_csv() {
    let csv = rings_to_csv(&block(2, 3), &RingGeometry::default(), &Palette::default());
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "# rows: 0..1 (2)");
    assert_eq!(lines[1], "# cols: 0..2 (3)");
    assert_eq!(lines[2], RING_CSV_HEADER);
    assert_eq!(lines.len(), 3 + 6);
    assert!(lines[3].starts_with("0,0,#ff0000,"));
    assert!(lines[3].ends_with(",7.94,1.6"));
}

#[test]
fn test_bom_exports_agree() {
    let store = block(4, 5);
    let bom = build_bom(
        store.iter().map(|(_, r)| r.color),
        &Palette::default(),
        3,
        BomMode::FullSheet,
    );
    let csv = bom_to_csv(&bom);
    assert_eq!(csv.lines().count(), 1 + Palette::default().len());
    let pages = bom_print_pages(&bom, 10);
    assert_eq!(pages.len(), Palette::default().len().div_ceil(10));
    assert!(pages[0].contains("#ff0000"));
}

#[test]
fn test_assembly_map_tiles_and_files() {
    let dir = tempdir().unwrap();
    let store = block(6, 6);
    let options = AssemblyMapOptions {
        cell_px: 10,
        tile_rows: 4,
        tile_cols: 4,
        margin_px: 4,
        ..AssemblyMapOptions::default()
    };
    let calibration = CalibrationContext::new(Arc::new(EventBus::new()));
    let map = build_assembly_map(
        &store,
        &RingGeometry::default(),
        &Palette::default(),
        &calibration,
        &options,
    );
    assert_eq!((map.tiles_across, map.tiles_down), (2, 2));
    let numbers: Vec<usize> = map.tiles.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);

    let written = save_assembly_map(&map, dir.path().join("map.png")).unwrap();
    assert_eq!(written.len(), 4);
    assert!(written[3].ends_with("map-4.png"));
    assert!(written.iter().all(|p| p.exists()));
}

#[test]
fn test_empty_store_has_no_map() {
    let calibration = CalibrationContext::new(Arc::new(EventBus::new()));
    let map = build_assembly_map(
        &RingStore::new(),
        &RingGeometry::default(),
        &Palette::default(),
        &calibration,
        &AssemblyMapOptions::default(),
    );
    assert!(map.tiles.is_empty());
}

#[test]
fn test_ring_labels_print_palette_numbers() {
    let calibration = CalibrationContext::new(Arc::new(EventBus::new()));
    let store = block(2, 2);
    let render = |label_rings: bool| {
        let options = AssemblyMapOptions {
            label_rings,
            ..AssemblyMapOptions::default()
        };
        build_assembly_map(
            &store,
            &RingGeometry::default(),
            &Palette::default(),
            &calibration,
            &options,
        )
        .tiles
        .remove(0)
        .image
    };
    let labelled = render(true);
    let plain = render(false);
    assert_eq!(labelled.dimensions(), plain.dimensions());

    // Labels only ever darken the map.
    let shade = |p: &image::Rgba<u8>| p.0[..3].iter().map(|&c| c as u32).sum::<u32>();
    let changed: Vec<_> = labelled
        .pixels()
        .zip(plain.pixels())
        .filter(|(a, b)| a != b)
        .collect();
    assert!(!changed.is_empty());
    assert!(changed.iter().all(|(a, b)| shade(a) < shade(b)));
}

use chainweave_designer::bom::{build_bom, packs_for, BomMode};
use chainweave_designer::color::HexColor;
use chainweave_designer::lattice::CellKey;
use chainweave_designer::palette::Palette;
use chainweave_designer::ring_store::RingStore;
use proptest::prelude::*;

#[test]
fn test_three_ring_scenario() {
    let mut store = RingStore::new();
    store.place(CellKey::new(0, 0), HexColor::new(255, 0, 0));
    store.place(CellKey::new(0, 1), HexColor::new(255, 0, 0));
    store.place(CellKey::new(1, 0), HexColor::new(0, 255, 0));
    let bom = build_bom(
        store.iter().map(|(_, r)| r.color),
        &Palette::default(),
        1500,
        BomMode::UsedOnly,
    );
    let summary: Vec<(usize, String, usize, usize)> = bom
        .lines
        .iter()
        .map(|l| (l.index, l.hex.to_string(), l.count, l.packs))
        .collect();
    assert_eq!(
        summary,
        vec![
            (3, "#ff0000".to_string(), 2, 1),
            (4, "#00ff00".to_string(), 1, 1),
        ]
    );
    assert_eq!(bom.total_packs, 2);
}

#[test]
fn test_empty_design_full_sheet() {
    let palette = Palette::default();
    let bom = build_bom(std::iter::empty(), &palette, 1500, BomMode::FullSheet);
    assert_eq!(bom.lines.len(), palette.len());
    assert!(bom.lines.iter().all(|l| l.count == 0 && l.packs == 0));
    assert_eq!(bom.used_lines().count(), 0);
}

#[test]
fn test_pack_boundaries() {
    assert_eq!(packs_for(0, 1500), 0);
    assert_eq!(packs_for(1500, 1500), 1);
    assert_eq!(packs_for(1501, 1500), 2);
    assert_eq!(packs_for(3, 0), 3);
}

proptest! {
    #[test]
    fn prop_bom_ignores_insertion_order(
        colors in prop::collection::vec((any::<u8>(), any::<u8>(), any::<u8>()), 0..200),
        pack_size in 1usize..50,
        seed in any::<u64>(),
    ) {
        let palette = Palette::default();
        let colors: Vec<HexColor> = colors.into_iter().map(|(r, g, b)| HexColor::new(r, g, b)).collect();
        let mut shuffled = colors.clone();
        // Deterministic rotation + reversal stands in for a shuffle.
        if !shuffled.is_empty() {
            let k = (seed as usize) % shuffled.len();
            shuffled.rotate_left(k);
        }
        shuffled.reverse();

        let a = build_bom(colors.iter().copied(), &palette, pack_size, BomMode::UsedOnly);
        let b = build_bom(shuffled, &palette, pack_size, BomMode::UsedOnly);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.lines.iter().map(|l| l.count).sum::<usize>(), colors.len());
        prop_assert!(a.lines.windows(2).all(|w| w[0].index < w[1].index));
        for line in &a.lines {
            prop_assert_eq!(line.packs, line.count.div_ceil(pack_size));
        }
    }
}

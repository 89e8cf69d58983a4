use std::collections::BTreeSet;

use chainweave_designer::lattice::{CellKey, HexLattice};
use chainweave_designer::selection::{compute_selection_keys, Selection, SelectionShape};
use glam::DVec2;
use proptest::prelude::*;

/// Every cell in a generous window whose center is inside the shape.
fn brute_force(selection: &Selection, lattice: &HexLattice) -> BTreeSet<CellKey> {
    let b = selection.bounds();
    let lo = lattice.approximate_cell(b.min);
    let hi = lattice.approximate_cell(b.max);
    let mut keys = BTreeSet::new();
    for row in lo.row.min(hi.row) - 6..=lo.row.max(hi.row) + 6 {
        for col in lo.col.min(hi.col) - 6..=lo.col.max(hi.col) + 6 {
            let key = CellKey::new(row, col);
            if selection.contains(lattice.cell_to_logical(key)) {
                keys.insert(key);
            }
        }
    }
    keys
}

fn shape_strategy() -> impl Strategy<Value = SelectionShape> {
    prop_oneof![Just(SelectionShape::Rectangle), Just(SelectionShape::Circle)]
}

#[test]
fn test_scenario_rectangle_around_three_rings() {
    let lattice = HexLattice::new(8.0);
    let sel = Selection::logical(
        SelectionShape::Rectangle,
        DVec2::new(-1.0, -1.0),
        DVec2::new(9.0, 7.5),
    );
    let keys = compute_selection_keys(&sel, &lattice, 2);
    let expected: BTreeSet<CellKey> = [CellKey::new(0, 0), CellKey::new(0, 1), CellKey::new(1, 0)]
        .into_iter()
        .collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_single_center_rectangle_selects_exactly_one() {
    let lattice = HexLattice::new(8.0);
    let center = lattice.cell_to_logical(CellKey::new(7, -3));
    let sel = Selection::logical(
        SelectionShape::Rectangle,
        center - DVec2::splat(0.1),
        center + DVec2::splat(0.1),
    );
    let keys = compute_selection_keys(&sel, &lattice, 2);
    assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec![CellKey::new(7, -3)]);
}

#[test]
fn test_non_finite_endpoints_select_nothing() {
    let lattice = HexLattice::new(8.0);
    let sel = Selection::logical(
        SelectionShape::Circle,
        DVec2::new(f64::NAN, 0.0),
        DVec2::new(10.0, 10.0),
    );
    assert!(compute_selection_keys(&sel, &lattice, 2).is_empty());
}

proptest! {
    #[test]
    fn prop_selected_centers_lie_inside(
        shape in shape_strategy(),
        ax in -200.0f64..200.0, ay in -200.0f64..200.0,
        bx in -200.0f64..200.0, by in -200.0f64..200.0,
    ) {
        let lattice = HexLattice::new(8.0);
        let sel = Selection::logical(shape, DVec2::new(ax, ay), DVec2::new(bx, by));
        for key in compute_selection_keys(&sel, &lattice, 2) {
            prop_assert!(sel.contains(lattice.cell_to_logical(key)));
        }
    }

    #[test]
    fn prop_default_margin_finds_every_inside_center(
        shape in shape_strategy(),
        ax in -120.0f64..120.0, ay in -120.0f64..120.0,
        bx in -120.0f64..120.0, by in -120.0f64..120.0,
    ) {
        let lattice = HexLattice::new(8.0);
        let sel = Selection::logical(shape, DVec2::new(ax, ay), DVec2::new(bx, by));
        prop_assert_eq!(compute_selection_keys(&sel, &lattice, 2), brute_force(&sel, &lattice));
    }

    #[test]
    fn prop_margin_of_one_is_enough(
        shape in shape_strategy(),
        ax in -120.0f64..120.0, ay in -120.0f64..120.0,
        bx in -120.0f64..120.0, by in -120.0f64..120.0,
        spacing in 3.0f64..15.0,
    ) {
        let lattice = HexLattice::new(spacing);
        let sel = Selection::logical(shape, DVec2::new(ax, ay), DVec2::new(bx, by));
        prop_assert_eq!(compute_selection_keys(&sel, &lattice, 1), brute_force(&sel, &lattice));
    }
}

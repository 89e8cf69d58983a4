use chainweave_designer::lattice::{CellKey, HexLattice};
use glam::DVec2;
use proptest::prelude::*;

fn brute_force_nearest(lattice: &HexLattice, p: DVec2) -> CellKey {
    let approx = lattice.approximate_cell(p);
    let mut best = approx;
    let mut best_dist = f64::INFINITY;
    for row in approx.row - 3..=approx.row + 3 {
        for col in approx.col - 3..=approx.col + 3 {
            let key = CellKey::new(row, col);
            let d = lattice.cell_to_logical(key).distance_squared(p);
            if d < best_dist {
                best = key;
                best_dist = d;
            }
        }
    }
    best
}

#[test]
fn test_concrete_centers() {
    let lattice = HexLattice::new(8.0);
    assert_eq!(lattice.cell_to_logical(CellKey::new(0, 0)), DVec2::ZERO);
    assert_eq!(lattice.cell_to_logical(CellKey::new(0, 1)), DVec2::new(8.0, 0.0));
    let odd = lattice.cell_to_logical(CellKey::new(1, 0));
    assert!((odd.x - 4.0).abs() < 1e-12);
    assert!((odd.y - 6.928).abs() < 1e-12);
}

#[test]
fn test_negative_rows_keep_parity() {
    let lattice = HexLattice::new(8.0);
    let p = lattice.cell_to_logical(CellKey::new(-1, 0));
    assert!((p.x - 4.0).abs() < 1e-12);
    assert_eq!(lattice.logical_to_cell(p), CellKey::new(-1, 0));
}

#[test]
fn test_cell_key_string_form() {
    assert_eq!(CellKey::new(-3, 12).to_string(), "-3-12");
    assert_eq!(CellKey::new(4, -1).to_string(), "4--1");
    assert_eq!("-3-12".parse::<CellKey>().unwrap(), CellKey::new(-3, 12));
    assert_eq!("4--1".parse::<CellKey>().unwrap(), CellKey::new(4, -1));
    assert!("4".parse::<CellKey>().is_err());
}

proptest! {
    #[test]
    fn prop_center_maps_back_to_cell(row in -10_000i32..10_000, col in -10_000i32..10_000) {
        let lattice = HexLattice::new(8.0);
        let key = CellKey::new(row, col);
        prop_assert_eq!(lattice.logical_to_cell(lattice.cell_to_logical(key)), key);
    }

    #[test]
    fn prop_nearest_cell_is_no_farther_than_neighbors(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        spacing in 2.0f64..20.0,
    ) {
        let lattice = HexLattice::new(spacing);
        let p = DVec2::new(x, y);
        let key = lattice.logical_to_cell(p);
        let d = lattice.cell_to_logical(key).distance_squared(p);
        for n in key.neighborhood() {
            prop_assert!(d <= lattice.cell_to_logical(n).distance_squared(p) + 1e-9);
        }
    }

    #[test]
    fn prop_nearest_cell_matches_brute_force(x in -300.0f64..300.0, y in -300.0f64..300.0) {
        let lattice = HexLattice::new(8.0);
        let p = DVec2::new(x, y);
        let found = lattice.logical_to_cell(p);
        let brute = brute_force_nearest(&lattice, p);
        let df = lattice.cell_to_logical(found).distance_squared(p);
        let db = lattice.cell_to_logical(brute).distance_squared(p);
        prop_assert!((df - db).abs() < 1e-9);
    }
}

use std::collections::BTreeSet;

use chainweave_designer::color::HexColor;
use chainweave_designer::connectivity::linked_components;
use chainweave_designer::lattice::CellKey;
use chainweave_designer::ring_store::{PlacementOutcome, RingStore};

const RED: HexColor = HexColor::new(255, 0, 0);
const BLUE: HexColor = HexColor::new(0, 0, 255);

#[test]
fn test_place_recolor_erase_lifecycle() {
    let mut store = RingStore::new();
    let key = CellKey::new(2, -5);
    assert_eq!(store.place(key, RED), PlacementOutcome::Created { cluster: 1 });
    assert_eq!(
        store.place(key, BLUE),
        PlacementOutcome::Recolored {
            cluster: 1,
            previous: RED
        }
    );
    assert_eq!(store.place(key, BLUE), PlacementOutcome::Unchanged);
    assert_eq!(store.next_cluster(), 2);
    assert_eq!(store.erase(key).map(|r| r.cluster), Some(1));
    assert!(store.is_empty());
}

#[test]
fn test_cluster_ids_are_never_reused() {
    let mut store = RingStore::new();
    store.place(CellKey::new(0, 0), RED);
    store.erase(CellKey::new(0, 0));
    assert_eq!(
        store.place(CellKey::new(0, 0), RED),
        PlacementOutcome::Created { cluster: 2 }
    );
    store.clear();
    assert_eq!(
        store.place(CellKey::new(5, 5), RED),
        PlacementOutcome::Created { cluster: 3 }
    );
}

#[test]
fn test_bulk_place_assigns_clusters_row_major() {
    let keys: BTreeSet<CellKey> = [
        CellKey::new(1, 0),
        CellKey::new(0, 1),
        CellKey::new(-1, 7),
        CellKey::new(0, 0),
    ]
    .into_iter()
    .collect();
    let mut store = RingStore::new();
    let summary = store.place_many(&keys, RED);
    assert_eq!(summary.created, 4);
    let clusters: Vec<(CellKey, u64)> = store
        .snapshot()
        .into_iter()
        .map(|(k, r)| (k, r.cluster))
        .collect();
    assert_eq!(
        clusters,
        vec![
            (CellKey::new(-1, 7), 1),
            (CellKey::new(0, 0), 2),
            (CellKey::new(0, 1), 3),
            (CellKey::new(1, 0), 4),
        ]
    );
}

#[test]
fn test_connectivity_does_not_touch_clusters() {
    let mut store = RingStore::new();
    store.place(CellKey::new(0, 0), RED);
    store.place(CellKey::new(0, 1), RED);
    store.place(CellKey::new(10, 10), BLUE);
    let before = store.clone();
    let components = linked_components(&store);
    assert_eq!(components.len(), 2);
    assert_eq!(
        components.component_of(CellKey::new(0, 0)),
        components.component_of(CellKey::new(0, 1))
    );
    assert_eq!(components.largest().map(|g| g.len()), Some(2));
    assert_eq!(store, before);
}

use chainweave_core::ProjectError;
use chainweave_designer::color::HexColor;
use chainweave_designer::geometry::RingGeometry;
use chainweave_designer::lattice::CellKey;
use chainweave_designer::palette::Palette;
use chainweave_designer::ring_store::RingStore;
use chainweave_designer::serialization::{ProjectFile, ProjectMetadata, PROJECT_FORMAT_VERSION};
use tempfile::tempdir;

fn store() -> RingStore {
    let mut store = RingStore::new();
    store.place(CellKey::new(-4, 9), HexColor::new(10, 20, 30));
    store.place(CellKey::new(0, 0), HexColor::new(255, 0, 0));
    store.place(CellKey::new(3, -1), HexColor::new(0, 0, 255));
    store.place(CellKey::new(0, 0), HexColor::new(0, 255, 0));
    store
}

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vest.json");
    let geometry = RingGeometry {
        inner_diameter: 6.35,
        wire_diameter: 1.2,
        center_spacing: 6.5,
        angle_in: 30.0,
        angle_out: -30.0,
    };
    let palette = Palette::default();
    let file = ProjectFile::new(ProjectMetadata::new("Vest"), geometry, &store(), Some(&palette));
    file.save_to_file(&path).unwrap();

    let loaded = ProjectFile::load_from_file(&path).unwrap();
    assert_eq!(loaded.store, store());
    assert_eq!(loaded.geometry, geometry);
    assert_eq!(loaded.metadata.name, "Vest");
    assert_eq!(loaded.palette, Some(palette));
    assert_eq!(loaded.store.next_cluster(), 4);
}

#[test]
fn test_save_overwrites_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("design.json");
    std::fs::write(&path, "old contents").unwrap();
    let file = ProjectFile::new(
        ProjectMetadata::new("New"),
        RingGeometry::default(),
        &store(),
        None,
    );
    file.save_to_file(&path).unwrap();
    let loaded = ProjectFile::load_from_file(&path).unwrap();
    assert_eq!(loaded.metadata.name, "New");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_failed_save_leaves_no_partial_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("design.json");
    let file = ProjectFile::new(
        ProjectMetadata::new("Nowhere"),
        RingGeometry::default(),
        &store(),
        None,
    );
    assert!(file.save_to_file(&path).is_err());
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_written_document_shape() {
    let file = ProjectFile::new(
        ProjectMetadata::new("Shape"),
        RingGeometry::default(),
        &store(),
        None,
    );
    let value: serde_json::Value = serde_json::from_str(&file.to_json().unwrap()).unwrap();
    assert_eq!(value["version"], PROJECT_FORMAT_VERSION);
    assert_eq!(value["geometry"]["innerDiameter"], 7.94);
    assert_eq!(value["rings"][0]["row"], -4);
    assert_eq!(value["rings"][1]["color"], "#00ff00");
    assert_eq!(value["rings"][1]["cluster"], 2);
    assert!(value.get("paletteAssignment").is_none());
}

#[test]
fn test_legacy_document_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    std::fs::write(
        &path,
        r##"{
            "name": "Old Coif",
            "id": 5.0,
            "wd": 1.0,
            "rings": [
                {"r": 1, "c": 0, "hex": "#ABC"},
                {"r": 0, "c": 2, "colour": "00ff00", "group": 7},
                {"r": 0, "c": 0, "color": "#ff0000"}
            ]
        }"##,
    )
    .unwrap();
    let loaded = ProjectFile::load_from_file(&path).unwrap();
    assert_eq!(loaded.metadata.name, "Old Coif");
    assert_eq!(loaded.geometry.inner_diameter, 5.0);
    assert_eq!(loaded.geometry.wire_diameter, 1.0);
    let clusters: Vec<(CellKey, u64)> = loaded
        .store
        .snapshot()
        .into_iter()
        .map(|(k, r)| (k, r.cluster))
        .collect();
    assert_eq!(
        clusters,
        vec![
            (CellKey::new(0, 0), 8),
            (CellKey::new(0, 2), 7),
            (CellKey::new(1, 0), 9),
        ]
    );
    assert_eq!(
        loaded.store.get(CellKey::new(1, 0)).unwrap().color,
        HexColor::new(0xaa, 0xbb, 0xcc)
    );
    assert_eq!(loaded.store.next_cluster(), 10);
}

#[test]
fn test_malformed_documents_are_rejected_wholesale() {
    let cases = [
        "[]",
        r##"{"version": 2, "metadata": {"name": "x"}, "geometry": {}, "rings": []}"##,
        r##"{"version": 3, "rings": []}"##,
        r##"{"rings": [{"r": 0, "c": 0}]}"##,
        r##"{"wd": -1, "rings": [{"r": 0, "c": 0, "hex": "#fff"}]}"##,
    ];
    for json in cases {
        assert!(ProjectFile::load_str(json).is_err(), "accepted {}", json);
    }
    assert!(matches!(
        ProjectFile::load_str(r##"{"version": 3, "rings": []}"##),
        Err(ProjectError::UnsupportedVersion { found: 3, .. })
    ));
}

#[test]
fn test_exhausted_cluster_ids_are_rejected() {
    let file = ProjectFile::new(ProjectMetadata::new("Edge"), RingGeometry::default(), &store(), None);
    let mut value: serde_json::Value = serde_json::from_str(&file.to_json().unwrap()).unwrap();
    value["rings"][0]["cluster"] = serde_json::json!(u64::MAX);
    assert!(matches!(
        ProjectFile::load_str(&value.to_string()),
        Err(ProjectError::InvalidField { ref field, .. }) if field == "cluster"
    ));

    let mut value: serde_json::Value = serde_json::from_str(&file.to_json().unwrap()).unwrap();
    value["nextCluster"] = serde_json::json!(u64::MAX);
    assert!(ProjectFile::load_str(&value.to_string()).is_err());

    let legacy = format!(
        r##"{{"version": 1, "rings": [{{"r": 0, "c": 0, "colour": "#ff0000", "group": {}}}, {{"r": 0, "c": 1, "hex": "#00ff00"}}]}}"##,
        u64::MAX
    );
    assert!(ProjectFile::load_str(&legacy).is_err());
}

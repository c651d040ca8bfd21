//! Document files.

use kerfline_core::{EngineConfig, Error};
use kerfline_designer::{
    BulgeVertex, ControlPoints, OffsetJoin, OffsetSide, Placement, Point, ShapeDocument,
    ShapeEntity, ShapeKind, ShapeStore,
};
use tempfile::TempDir;

fn sample_store() -> ShapeStore {
    let mut store = ShapeStore::new();
    let gear = store.add(ShapeEntity::new(
        ShapeKind::Gear {
            module: 1.5,
            teeth: 18,
            pressure_angle: 20.0,
            hole_radius: 2.0,
        },
        Placement::at(40.0, 40.0),
    ));
    store.add(ShapeEntity::new(
        ShapeKind::Spline(ControlPoints::new(
            vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 0.0)],
            false,
        )),
        Placement::corner(0.0, 60.0),
    ));
    store.add(ShapeEntity::new(
        ShapeKind::BulgePolyline {
            vertices: vec![
                BulgeVertex::new(0.0, 0.0, 0.0),
                BulgeVertex::new(10.0, 0.0, 0.4),
                BulgeVertex::new(10.0, 10.0, 0.0),
            ],
            closed: true,
        },
        Placement {
            x: 80.0,
            y: 10.0,
            rotation: 15.0,
            centered: false,
        },
    ));
    store
        .add_toolpath(gear, 0.75, OffsetSide::Outset, OffsetJoin::Line)
        .unwrap();
    store
}

#[test]
fn test_document_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("design.json");

    let mut store = sample_store();
    let document = ShapeDocument::from_store("sample", &store);
    document.save_to_file(&path).unwrap();

    let loaded = ShapeDocument::load_from_file(&path).unwrap();
    assert_eq!(loaded, document);

    let mut rebuilt = loaded.into_store(EngineConfig::default()).unwrap();
    for id in store.ids().to_vec() {
        let original = store.path(id).unwrap().clone();
        assert_eq!(rebuilt.path(id).unwrap(), &original);
    }
}

#[test]
fn test_caches_are_not_written() {
    let mut store = sample_store();
    for id in store.ids().to_vec() {
        store.path(id).unwrap();
    }
    let json = serde_json::to_string(&ShapeDocument::from_store("cached", &store)).unwrap();
    assert!(!json.contains("subpaths"));
}

#[test]
fn test_missing_and_malformed_files() {
    let dir = TempDir::new().unwrap();
    let missing = ShapeDocument::load_from_file(dir.path().join("nope.json"));
    assert!(matches!(missing, Err(Error::Io(_))));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(ShapeDocument::load_from_file(&bad), Err(Error::Json(_))));
}

//! Store invalidation fan-out.

use std::cell::RefCell;
use std::rc::Rc;

use kerfline_core::EngineConfig;
use kerfline_designer::{
    OffsetJoin, OffsetSide, Placement, ShapeEntity, ShapeEvent, ShapeKind, ShapeStore,
};

#[test]
fn test_every_observer_of_a_shape_is_called() {
    let mut store = ShapeStore::new();
    let a = store.add(ShapeEntity::new(ShapeKind::rectangle(5.0, 5.0), Placement::default()));
    let b = store.add(ShapeEntity::new(ShapeKind::rectangle(5.0, 5.0), Placement::default()));

    let log = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second"] {
        let sink = log.clone();
        store
            .subscribe(a, move |event| {
                if let ShapeEvent::Invalidated(_) = event {
                    sink.borrow_mut().push(tag);
                }
            })
            .unwrap();
    }
    let other = log.clone();
    store
        .subscribe(b, move |_| other.borrow_mut().push("other"))
        .unwrap();

    store.update(a, |shape| shape.set_rotation(45.0)).unwrap();
    assert_eq!(*log.borrow(), vec!["first", "second"]);
}

#[test]
fn test_toolpaths_follow_their_source_only() {
    let mut store = ShapeStore::with_config(EngineConfig::default());
    let a = store.add(ShapeEntity::new(ShapeKind::rectangle(10.0, 10.0), Placement::default()));
    let b = store.add(ShapeEntity::new(
        ShapeKind::Oval {
            width: 10.0,
            height: 10.0,
        },
        Placement::at(30.0, 0.0),
    ));
    let ta = store
        .add_toolpath(a, 1.0, OffsetSide::Inset, OffsetJoin::Line)
        .unwrap();
    let tb = store
        .add_toolpath(b, 1.0, OffsetSide::Outset, OffsetJoin::Round)
        .unwrap();
    store.toolpath_path(ta).unwrap();
    store.toolpath_path(tb).unwrap();

    store.invalidate(a).unwrap();
    assert!(!store.toolpath(ta).unwrap().is_cached());
    assert!(store.toolpath(tb).unwrap().is_cached());

    let inset = store.toolpath_path(ta).unwrap().bounds().unwrap();
    assert!((inset.width() - 8.0).abs() < 1e-9);
    let outset = store.toolpath_path(tb).unwrap().bounds().unwrap();
    assert!((outset.width() - 12.0).abs() < 0.05);
}

#[test]
fn test_insertion_order_is_kept() {
    let mut store = ShapeStore::new();
    let ids: Vec<_> = (0..5)
        .map(|i| {
            store.add(ShapeEntity::new(
                ShapeKind::rectangle(1.0 + i as f64, 1.0),
                Placement::default(),
            ))
        })
        .collect();
    store.remove(ids[2]).unwrap();
    let remaining: Vec<_> = store.shapes().map(|s| s.id()).collect();
    assert_eq!(remaining, vec![ids[0], ids[1], ids[3], ids[4]]);
}

#[test]
fn test_replacing_a_shape_rebuilds_its_toolpaths() {
    let mut store = ShapeStore::new();
    let id = store.add(ShapeEntity::new(ShapeKind::rectangle(10.0, 10.0), Placement::default()));
    let toolpath = store
        .add_toolpath(id, 1.0, OffsetSide::Outset, OffsetJoin::Line)
        .unwrap();
    let before = store.toolpath_path(toolpath).unwrap().bounds().unwrap();
    assert!((before.width() - 12.0).abs() < 1e-9);

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    store
        .subscribe(id, move |event| sink.borrow_mut().push(*event))
        .unwrap();

    store.add(ShapeEntity::with_id(
        id,
        ShapeKind::rectangle(40.0, 40.0),
        Placement::default(),
    ));
    assert_eq!(store.len(), 1);
    assert_eq!(store.ids(), &[id]);
    assert!(!store.toolpath(toolpath).unwrap().is_cached());

    let after = store.toolpath_path(toolpath).unwrap().bounds().unwrap();
    assert!((after.width() - 42.0).abs() < 1e-9);
    assert_eq!(
        *events.borrow(),
        vec![
            ShapeEvent::Invalidated(id),
            ShapeEvent::ToolpathInvalidated {
                toolpath,
                source: id
            },
        ]
    );
}

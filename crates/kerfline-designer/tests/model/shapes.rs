//! Shape caching and placement.

use kerfline_designer::{
    BulgeVertex, ControlPoints, Path, Placement, Point, ShapeEntity, ShapeKind,
};

#[test]
fn test_consecutive_reads_return_identical_paths() {
    let mut shape = ShapeEntity::new(
        ShapeKind::Gear {
            module: 2.0,
            teeth: 16,
            pressure_angle: 20.0,
            hole_radius: 3.0,
        },
        Placement::at(50.0, 50.0),
    );
    let first = shape.path().clone();
    let second = shape.path().clone();
    assert_eq!(first, second);

    shape.set_rotation(10.0);
    assert_ne!(shape.path(), &first);
    shape.set_rotation(0.0);
    assert_eq!(shape.path(), &first);
}

#[test]
fn test_parameter_edit_is_never_stale() {
    let mut shape = ShapeEntity::new(
        ShapeKind::Polygon {
            sides: 6,
            radius: 10.0,
        },
        Placement::default(),
    );
    let before = shape.path().clone();
    shape.set_kind(ShapeKind::Polygon {
        sides: 8,
        radius: 10.0,
    });
    let after = shape.path().clone();
    assert_ne!(before, after);
    assert_eq!(after.segment_count(), 7);
}

#[test]
fn test_non_centered_rectangle_upper_left_is_position() {
    for (x, y, w, h) in [(0.0, 0.0, 1.0, 1.0), (12.5, -3.25, 40.0, 7.0), (-100.0, 3.0, 0.5, 9.0)] {
        let mut shape = ShapeEntity::new(ShapeKind::rectangle(w, h), Placement::corner(x, y));
        let b = shape.bounds().unwrap();
        assert_eq!((b.min_x, b.min_y), (x, y));
        assert!((b.width() - w).abs() < 1e-12);
        assert!((b.height() - h).abs() < 1e-12);
    }
}

#[test]
fn test_bulge_polyline_shape() {
    let vertices = vec![
        BulgeVertex::new(0.0, 0.0, 1.0),
        BulgeVertex::new(10.0, 0.0, 1.0),
    ];
    let mut shape = ShapeEntity::new(
        ShapeKind::BulgePolyline {
            vertices,
            closed: true,
        },
        Placement::corner(0.0, 0.0),
    );
    let b = shape.bounds().unwrap();
    assert!((b.width() - 10.0).abs() < 1e-9);
    assert!((b.height() - 10.0).abs() < 1e-9);
    assert!(b.min_x.abs() < 1e-9 && b.min_y.abs() < 1e-9);
}

#[test]
fn test_imported_path_and_spline_edit() {
    let mut imported = ShapeEntity::new(
        ShapeKind::Imported(Path::polygon(&[
            Point::new(100.0, 100.0),
            Point::new(110.0, 100.0),
            Point::new(110.0, 120.0),
        ])),
        Placement::at(0.0, 0.0),
    );
    let b = imported.bounds().unwrap();
    assert!(b.center().approx_eq(&Point::ORIGIN, 1e-12));

    let mut spline = ShapeEntity::new(
        ShapeKind::Spline(ControlPoints::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            false,
        )),
        Placement::corner(0.0, 0.0),
    );
    let before = spline.bounds().unwrap();
    spline.edit_kind(|kind| {
        if let ShapeKind::Spline(points) = kind {
            points.move_point(1, Point::new(20.0, 0.0));
        }
    });
    let after = spline.bounds().unwrap();
    assert!((before.width() - 10.0).abs() < 1e-9);
    assert!((after.width() - 20.0).abs() < 1e-9);
}

#[test]
fn test_to_lyon_path_has_events() {
    let mut shape = ShapeEntity::new(
        ShapeKind::Oval {
            width: 4.0,
            height: 2.0,
        },
        Placement::default(),
    );
    assert!(shape.to_lyon_path().iter().count() > 0);
}

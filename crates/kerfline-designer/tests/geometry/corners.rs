//! Corner rounding area changes.

use std::f64::consts::PI;

use kerfline_designer::ops::{path_to_sketch, sketch_area};
use kerfline_designer::{round_corners, CornerRounder, Path, Point};

fn area(path: &Path) -> f64 {
    sketch_area(&path_to_sketch(path, 0.01))
}

/// Area a square corner loses when filleted with radius `r`.
fn fillet_loss(r: f64) -> f64 {
    r * r - PI * r * r / 4.0
}

#[test]
fn test_right_triangle_loses_one_corner() {
    let path = Path::polygon(&[
        Point::new(0.0, 0.0),
        Point::new(30.0, 0.0),
        Point::new(0.0, 20.0),
    ]);
    let r = 3.0;
    let delta = area(&round_corners(&path, r)) - 300.0;
    assert!((delta + fillet_loss(r)).abs() < 0.05, "delta {delta}");
}

#[test]
fn test_l_shape_rounds_inner_corner_outward() {
    let path = Path::polygon(&[
        Point::new(0.0, 0.0),
        Point::new(20.0, 0.0),
        Point::new(20.0, 10.0),
        Point::new(10.0, 10.0),
        Point::new(10.0, 20.0),
        Point::new(0.0, 20.0),
    ]);
    let r = 2.0;
    let rounded = round_corners(&path, r);
    // Five convex corners lose material, the concave one gains it.
    let delta = area(&rounded) - 300.0;
    assert!((delta + 4.0 * fillet_loss(r)).abs() < 0.05, "delta {delta}");

    let bounds = rounded.bounds().unwrap();
    assert!((bounds.width() - 20.0).abs() < 1e-6);
    assert!((bounds.height() - 20.0).abs() < 1e-6);
}

#[test]
fn test_hole_corners_are_rounded_inward() {
    let mut path = Path::polygon(&[
        Point::new(0.0, 0.0),
        Point::new(20.0, 0.0),
        Point::new(20.0, 20.0),
        Point::new(0.0, 20.0),
    ]);
    path.extend(Path::polygon(&[
        Point::new(5.0, 5.0),
        Point::new(5.0, 15.0),
        Point::new(15.0, 15.0),
        Point::new(15.0, 5.0),
    ]));
    let r = 1.0;
    let before = area(&path);
    assert!((before - 300.0).abs() < 1e-6);
    // Outer corners lose area; hole corners are filled, so the hole shrinks.
    let delta = area(&round_corners(&path, r)) - before;
    assert!(delta.abs() < 0.05, "delta {delta}");
}

#[test]
fn test_no_corners_leaves_path_alone() {
    let path = Path::polygon(&[
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(5.0, 8.0),
    ]);
    let rounder = CornerRounder::default();
    assert_eq!(rounder.round(&path, 1.0), path);
}

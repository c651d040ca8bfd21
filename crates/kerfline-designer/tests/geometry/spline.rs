//! Spline fitting through its control points.

use kerfline_designer::{flatten, ControlPoints, Point};

#[test]
fn test_open_spline_passes_through_every_point_in_order() {
    let points = vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 15.0),
        Point::new(20.0, -5.0),
        Point::new(35.0, 10.0),
        Point::new(40.0, 0.0),
    ];
    let spline = ControlPoints::new(points.clone(), false);
    let polylines = flatten(&spline.fit(), 1.0, 0.05);
    assert_eq!(polylines.len(), 1);

    let mut cursor = 0;
    for p in &points {
        let found = polylines[0].points[cursor..]
            .iter()
            .position(|q| q == p)
            .expect("control point on the flattened curve");
        cursor += found;
    }
    assert_eq!(polylines[0].last(), Some(points[4]));
}

#[test]
fn test_refit_after_insert_keeps_order() {
    let mut spline = ControlPoints::new(
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 0.0),
        ],
        false,
    );
    let index = spline.insert_near(Point::new(25.0, 0.1), 1.0, 0.5).unwrap();
    assert_eq!(index, 3);
    let xs: Vec<f64> = spline.points.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 10.0, 20.0, 25.0, 30.0]);
    assert_eq!(spline.fit().segment_count(), 4);
}

#[test]
fn test_closed_spline_flattens_to_closed_polyline() {
    let spline = ControlPoints::new(
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 8.0),
        ],
        true,
    );
    let polylines = flatten(&spline.fit(), 1.0, 0.05);
    assert!(polylines[0].closed);
    assert_eq!(polylines[0].first(), polylines[0].last());
}

#[test]
fn test_insert_on_closing_span_appends() {
    let mut spline = ControlPoints::new(
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ],
        true,
    );
    // Midpoint of the span from (0, 10) back to (0, 0).
    let click = Point::new(-1.25, 5.0);
    assert_eq!(spline.insert_near(click, 1.0, 0.5), Some(4));
    assert_eq!(spline.points[4], click);
    assert_eq!(spline.fit().segment_count(), 5);
}

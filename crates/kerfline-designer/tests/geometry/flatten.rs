//! Flattening fidelity and chord-count floor.

use kerfline_designer::{flatten, Path, Point, Segment, Tessellator};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -10.0f64..10.0
}

fn point() -> impl Strategy<Value = Point> {
    (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chord_midpoints_stay_within_tolerance(
        p0 in point(),
        p1 in point(),
        p2 in point(),
        p3 in point(),
        exponent in -3.0f64..-1.0,
    ) {
        let tolerance = 10f64.powf(exponent);
        let seg = Segment::cubic(p0, p1, p2, p3);
        let pl = Tessellator::new(tolerance).flatten_segment(&seg, 1.0);
        let n = pl.segment_count();
        prop_assert!(n >= 3);
        prop_assert_eq!(pl.first(), Some(p0));
        prop_assert_eq!(pl.last(), Some(p3));
        for (i, chord) in pl.segments().enumerate() {
            let on_curve = seg.sample((i as f64 + 0.5) / n as f64);
            prop_assert!(chord.midpoint().distance_to(&on_curve) <= tolerance);
        }
    }

    #[test]
    fn any_curve_gets_at_least_three_chords(
        p0 in point(),
        c in point(),
        p2 in point(),
    ) {
        let seg = Segment::quad(p0, c, p2);
        let pl = Tessellator::new(1000.0).flatten_segment(&seg, 1.0);
        prop_assert!(pl.segment_count() >= 3);
    }
}

#[test]
fn test_subpaths_share_endpoints_exactly_after_scaling() {
    let mut b = Path::builder();
    b.move_to(Point::new(0.0, 0.0))
        .cubic_to(Point::new(1.0, 2.0), Point::new(3.0, 2.0), Point::new(4.0, 0.0))
        .quad_to(Point::new(5.0, -1.0), Point::new(6.0, 0.0))
        .line_to(Point::new(6.0, 3.0))
        .close();
    let polylines = flatten(&b.build(), 2.5, 0.05);
    assert_eq!(polylines.len(), 1);
    let pl = &polylines[0];
    assert!(pl.closed);
    assert_eq!(pl.first(), Some(Point::new(0.0, 0.0)));
    assert_eq!(pl.last(), Some(Point::new(0.0, 0.0)));
    assert!(pl.points.contains(&Point::new(10.0, 0.0)));
    assert!(pl.points.contains(&Point::new(15.0, 0.0)));
    assert!(pl.points.contains(&Point::new(15.0, 7.5)));
}

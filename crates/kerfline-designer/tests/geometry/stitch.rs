//! Stitching of shuffled, partly reversed loop fragments.

use std::f64::consts::PI;

use kerfline_designer::{stitch, stitch_lines, LineSegment, Point, Polyline};
use proptest::prelude::*;

fn regular_loop(sides: usize, radius: f64, phase: f64) -> Vec<LineSegment> {
    let pts: Vec<Point> = (0..sides)
        .map(|i| {
            let a = phase + 2.0 * PI * i as f64 / sides as f64;
            Point::new(radius * a.cos(), radius * a.sin())
        })
        .collect();
    (0..sides)
        .map(|i| LineSegment::new(pts[i], pts[(i + 1) % sides]))
        .collect()
}

fn shuffled_loop() -> impl Strategy<Value = (Vec<LineSegment>, f64)> {
    (3usize..24, 1.0f64..100.0, 0.0f64..PI)
        .prop_flat_map(|(sides, radius, phase)| {
            let lines = regular_loop(sides, radius, phase);
            let total: f64 = lines.iter().map(|l| l.length()).sum();
            (
                Just(lines).prop_shuffle(),
                proptest::collection::vec(any::<bool>(), sides),
                Just(total),
            )
        })
        .prop_map(|(lines, flips, total)| {
            let lines = lines
                .into_iter()
                .zip(flips)
                .map(|(l, flip)| if flip { l.reversed() } else { l })
                .collect();
            (lines, total)
        })
}

proptest! {
    #[test]
    fn loop_fragments_stitch_into_one_closed_polyline((lines, total) in shuffled_loop()) {
        let result = stitch_lines(&lines);
        prop_assert_eq!(result.len(), 1);
        let pl = &result[0];
        prop_assert!(pl.closed);
        prop_assert_eq!(pl.segment_count(), lines.len());
        prop_assert_eq!(pl.first(), pl.last());
        prop_assert!((pl.length() - total).abs() < 1e-6 * total.max(1.0));
    }

    #[test]
    fn single_polyline_is_unchanged(
        steps in proptest::collection::vec((0.5f64..5.0, 0.0f64..(2.0 * PI)), 1..30)
    ) {
        let mut points = vec![Point::new(0.0, 0.0)];
        for (len, angle) in steps {
            let last = points[points.len() - 1];
            points.push(Point::new(last.x + len * angle.cos(), last.y + len * angle.sin()));
        }
        let pl = Polyline::open(points);
        let first = pl.points[0];
        let last = pl.points[pl.len() - 1];
        prop_assume!(first.distance_to(&last) > 1e-3);
        prop_assert_eq!(stitch(&[pl.clone()]), vec![pl]);
    }
}

#[test]
fn test_two_separate_loops() {
    let mut lines = regular_loop(4, 1.0, 0.0);
    lines.extend(
        regular_loop(3, 1.0, 0.0)
            .into_iter()
            .map(|l| LineSegment::new(l.start + Point::new(10.0, 0.0), l.end + Point::new(10.0, 0.0))),
    );
    let result = stitch_lines(&lines);
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|p| p.closed));
    assert_eq!(result[0].segment_count(), 4);
    assert_eq!(result[1].segment_count(), 3);
}

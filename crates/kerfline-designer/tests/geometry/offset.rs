//! Offset distance on convex polygons.

use std::f64::consts::PI;

use kerfline_designer::{
    offset, OffsetJoin, OffsetSide, Point, Polyline, Tessellator, ToolpathOffsetter,
};
use proptest::prelude::*;

fn regular(sides: usize, radius: f64) -> Polyline {
    Polyline::closed_loop(
        (0..sides)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / sides as f64;
                Point::new(radius * a.cos(), radius * a.sin())
            })
            .collect(),
    )
}

/// Largest signed distance of `p` past any supporting line of a
/// counter-clockwise convex ring; positive outside.
fn outward_distance(ring: &[Point], p: &Point) -> f64 {
    (0..ring.len())
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];
            let dir = (b - a).normalized().unwrap();
            (*p - a).cross(&dir)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

proptest! {
    #[test]
    fn offset_points_sit_at_tool_radius(
        sides in 3usize..12,
        radius in 5.0f64..50.0,
        r in 0.1f64..2.0,
        outward in any::<bool>(),
    ) {
        let source = regular(sides, radius);
        let side = OffsetSide::from_outward(outward);
        let path = offset(std::slice::from_ref(&source), r, side);
        let result = Tessellator::new(0.1).flatten(&path, 1.0);
        prop_assert_eq!(result.len(), 1);
        let expected = if outward { r } else { -r };
        for p in result[0].vertices() {
            let d = outward_distance(source.vertices(), p);
            prop_assert!((d - expected).abs() < 1e-9, "distance {} expected {}", d, expected);
        }
    }
}

#[test]
fn test_zero_radius_returns_source() {
    let source = regular(5, 3.0);
    let offsetter = ToolpathOffsetter::new(OffsetJoin::Line, 0.01);
    let result = offsetter.offset_polylines(std::slice::from_ref(&source), 0.0, OffsetSide::Inset);
    assert_eq!(result, vec![source]);
}

#[test]
fn test_round_join_inset_matches_line_join_on_square() {
    // Insetting a convex outline leaves no convex corner to round.
    let square = regular(4, 10.0);
    let line = ToolpathOffsetter::new(OffsetJoin::Line, 0.01)
        .offset_polylines(std::slice::from_ref(&square), 1.0, OffsetSide::Inset);
    let round = ToolpathOffsetter::new(OffsetJoin::Round, 0.01)
        .offset_polylines(std::slice::from_ref(&square), 1.0, OffsetSide::Inset);
    assert_eq!(round.len(), 1);
    assert!((line[0].signed_area().abs() - round[0].signed_area().abs()).abs() < 1e-6);
}

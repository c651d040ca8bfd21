//! Freehand splines: Catmull-Rom control points fitted with cubic Béziers.
//!
//! Every control point lies on the fitted curve. For a span from `p1` to
//! `p2` with neighbours `p0` and `p3` the Bézier controls are
//! `(-p0 + 6·p1 + p2) / 6` and `(p1 + 6·p2 - p3) / 6`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{Path, PathBuilder, Point, Segment};
use crate::tessellate::Tessellator;

/// Coordinate match used to recognise a control point at a segment start.
const CONTROL_POINT_MATCH: f64 = 1e-9;

/// Chord tolerance for insertion hit testing, in screen pixels.
const INSERT_TOLERANCE_PX: f64 = 0.25;

/// Fits a Catmull-Rom spline through `points`.
///
/// Open lists are clamped at both ends so the first and last points are
/// interpolated. Closed lists wrap around. Degenerate inputs never fail:
/// no points give an empty path, one point a bare move, and a closed list
/// with fewer than three points is fitted as open.
pub fn fit(points: &[Point], closed: bool) -> Path {
    let mut builder = PathBuilder::new();
    let n = points.len();
    let Some(first) = points.first() else {
        return builder.build();
    };
    builder.move_to(*first);
    if n == 1 {
        return builder.build();
    }

    let closed = closed && n >= 3;
    let spans = if closed { n } else { n - 1 };
    for i in 0..spans {
        let (p0, p1, p2, p3) = if closed {
            (
                points[(i + n - 1) % n],
                points[i],
                points[(i + 1) % n],
                points[(i + 2) % n],
            )
        } else {
            (
                points[i.saturating_sub(1)],
                points[i],
                points[i + 1],
                points[(i + 2).min(n - 1)],
            )
        };
        let (c1, c2) = bezier_controls(p0, p1, p2, p3);
        builder.cubic_to(c1, c2, p2);
    }

    if closed {
        builder.close();
    }
    builder.build()
}

/// Bézier control points for the Catmull-Rom span `p1`-`p2`.
pub fn bezier_controls(p0: Point, p1: Point, p2: Point, p3: Point) -> (Point, Point) {
    let c1 = Point::new(
        (-p0.x + 6.0 * p1.x + p2.x) / 6.0,
        (-p0.y + 6.0 * p1.y + p2.y) / 6.0,
    );
    let c2 = Point::new(
        (p1.x + 6.0 * p2.x - p3.x) / 6.0,
        (p1.y + 6.0 * p2.y - p3.y) / 6.0,
    );
    (c1, c2)
}

/// An editable list of spline control points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlPoints {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl ControlPoints {
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        Self { points, closed }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn fit(&self) -> Path {
        fit(&self.points, self.closed)
    }

    /// Index of the first control point within `threshold` of `click`.
    pub fn hit_point(&self, click: Point, threshold: f64) -> Option<usize> {
        self.points
            .iter()
            .position(|p| p.distance_to(&click) <= threshold)
    }

    /// Inserts `click` (design units) as a new control point if the fitted
    /// curve, drawn at `scale` pixels per unit, passes within
    /// `threshold_px` screen pixels of it. Returns the index of the
    /// inserted point.
    ///
    /// The fit is flattened at screen scale and walked in order; the number
    /// of control points passed before the hit chord is the insertion index.
    pub fn insert_near(&mut self, click: Point, scale: f64, threshold_px: f64) -> Option<usize> {
        let path = self.fit();
        let tessellator = Tessellator::new(INSERT_TOLERANCE_PX);
        let screen = click.scaled(scale);
        let mut passed = 0usize;

        for segment in path.segments() {
            if passed < self.points.len()
                && segment
                    .start()
                    .approx_eq(&self.points[passed], CONTROL_POINT_MATCH)
            {
                passed += 1;
            }
            let chords = tessellator.flatten_segment(segment, scale);
            let hit = chords
                .segments()
                .any(|chord| chord.distance_to_point(&screen) <= threshold_px);
            if hit {
                let index = passed.min(self.points.len());
                self.points.insert(index, click);
                debug!("Inserted spline control point {} of {}", index, self.points.len());
                return Some(index);
            }
        }
        None
    }

    /// Moves a control point. Out-of-range indices are ignored.
    pub fn move_point(&mut self, index: usize, to: Point) -> bool {
        match self.points.get_mut(index) {
            Some(p) => {
                *p = to;
                true
            }
            None => false,
        }
    }

    pub fn remove_point(&mut self, index: usize) -> Option<Point> {
        if index < self.points.len() {
            Some(self.points.remove(index))
        } else {
            None
        }
    }

    /// Cubic spans of the current fit.
    pub fn spans(&self) -> Vec<Segment> {
        self.fit().segments().copied().collect()
    }
}

//! Segment types: straight lines and quadratic/cubic Bézier curves.

use lyon::geom::{CubicBezierSegment, QuadraticBezierSegment};
use serde::{Deserialize, Serialize};

use super::{Bounds, Point};

/// One piece of a subpath. Carries no style, only geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    Line {
        start: Point,
        end: Point,
    },
    QuadCurve {
        start: Point,
        control: Point,
        end: Point,
    },
    CubicCurve {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
}

impl Segment {
    pub fn line(start: Point, end: Point) -> Self {
        Segment::Line { start, end }
    }

    pub fn quad(start: Point, control: Point, end: Point) -> Self {
        Segment::QuadCurve {
            start,
            control,
            end,
        }
    }

    pub fn cubic(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        Segment::CubicCurve {
            start,
            control1,
            control2,
            end,
        }
    }

    pub fn start(&self) -> Point {
        match self {
            Segment::Line { start, .. }
            | Segment::QuadCurve { start, .. }
            | Segment::CubicCurve { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line { end, .. }
            | Segment::QuadCurve { end, .. }
            | Segment::CubicCurve { end, .. } => *end,
        }
    }

    pub fn is_curve(&self) -> bool {
        !matches!(self, Segment::Line { .. })
    }

    /// Start, control and end points in order.
    pub fn points(&self) -> Vec<Point> {
        match *self {
            Segment::Line { start, end } => vec![start, end],
            Segment::QuadCurve {
                start,
                control,
                end,
            } => vec![start, control, end],
            Segment::CubicCurve {
                start,
                control1,
                control2,
                end,
            } => vec![start, control1, control2, end],
        }
    }

    /// Sum of the distances between consecutive control/end points.
    ///
    /// Always at least the true arc length, which makes it a safe estimate
    /// for choosing a chord count.
    pub fn control_polygon_length(&self) -> f64 {
        self.points()
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }

    /// Evaluates the segment at parameter `t` in `[0, 1]`.
    pub fn sample(&self, t: f64) -> Point {
        match *self {
            Segment::Line { start, end } => start.lerp(&end, t),
            Segment::QuadCurve {
                start,
                control,
                end,
            } => QuadraticBezierSegment {
                from: start.into(),
                ctrl: control.into(),
                to: end.into(),
            }
            .sample(t)
            .into(),
            Segment::CubicCurve {
                start,
                control1,
                control2,
                end,
            } => CubicBezierSegment {
                from: start.into(),
                ctrl1: control1.into(),
                ctrl2: control2.into(),
                to: end.into(),
            }
            .sample(t)
            .into(),
        }
    }

    /// Applies `f` to every defining point. Affine maps keep Bézier
    /// segments exact.
    pub fn map_points<F: Fn(Point) -> Point>(&self, f: F) -> Segment {
        match *self {
            Segment::Line { start, end } => Segment::line(f(start), f(end)),
            Segment::QuadCurve {
                start,
                control,
                end,
            } => Segment::quad(f(start), f(control), f(end)),
            Segment::CubicCurve {
                start,
                control1,
                control2,
                end,
            } => Segment::cubic(f(start), f(control1), f(control2), f(end)),
        }
    }

    pub fn reversed(&self) -> Segment {
        match *self {
            Segment::Line { start, end } => Segment::line(end, start),
            Segment::QuadCurve {
                start,
                control,
                end,
            } => Segment::quad(end, control, start),
            Segment::CubicCurve {
                start,
                control1,
                control2,
                end,
            } => Segment::cubic(end, control2, control1, start),
        }
    }

    /// Tight bounding box of the segment (curves use their extrema).
    pub fn bounds(&self) -> Bounds {
        match *self {
            Segment::Line { start, end } => Bounds::from_points(&[start, end]),
            Segment::QuadCurve {
                start,
                control,
                end,
            } => {
                let bb = QuadraticBezierSegment {
                    from: start.into(),
                    ctrl: control.into(),
                    to: end.into(),
                }
                .bounding_box();
                Bounds::new(bb.min.x, bb.min.y, bb.max.x, bb.max.y)
            }
            Segment::CubicCurve {
                start,
                control1,
                control2,
                end,
            } => {
                let bb = CubicBezierSegment {
                    from: start.into(),
                    ctrl1: control1.into(),
                    ctrl2: control2.into(),
                    to: end.into(),
                }
                .bounding_box();
                Bounds::new(bb.min.x, bb.min.y, bb.max.x, bb.max.y)
            }
        }
    }
}

/// A straight segment, the unit the stitcher and offset generator work on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Unit direction from start to end, `None` when degenerate.
    pub fn direction(&self) -> Option<Point> {
        (self.end - self.start).normalized()
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(&self.end)
    }

    pub fn reversed(&self) -> LineSegment {
        LineSegment::new(self.end, self.start)
    }

    pub fn distance_to_point(&self, p: &Point) -> f64 {
        p.distance_to_segment(&self.start, &self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_sample_endpoints() {
        let seg = Segment::cubic(
            Point::new(0.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(3.0, 2.0),
            Point::new(4.0, 0.0),
        );
        assert!(seg.sample(0.0).approx_eq(&Point::new(0.0, 0.0), 1e-12));
        assert!(seg.sample(1.0).approx_eq(&Point::new(4.0, 0.0), 1e-12));
        assert!(seg.sample(0.5).approx_eq(&Point::new(2.0, 1.5), 1e-12));
    }

    #[test]
    fn test_control_polygon_length() {
        let seg = Segment::quad(
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(6.0, 0.0),
        );
        assert_eq!(seg.control_polygon_length(), 10.0);
    }

    #[test]
    fn test_reversed_swaps_controls() {
        let seg = Segment::cubic(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 1.0),
        );
        let rev = seg.reversed();
        assert_eq!(rev.start(), seg.end());
        assert_eq!(rev.end(), seg.start());
        assert!(rev.sample(0.25).approx_eq(&seg.sample(0.75), 1e-12));
    }

    #[test]
    fn test_cubic_bounds_use_extrema() {
        let seg = Segment::cubic(
            Point::new(0.0, 0.0),
            Point::new(0.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 0.0),
        );
        let b = seg.bounds();
        assert!((b.max_y - 3.0).abs() < 1e-9);
        assert_eq!(b.min_x, 0.0);
        assert_eq!(b.max_x, 4.0);
    }
}

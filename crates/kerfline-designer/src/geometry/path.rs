//! Subpaths, paths and a builder for them.

use lyon::geom::Transform;
use serde::{Deserialize, Serialize};

use super::{Bounds, Point, Polyline, Segment};

/// One contiguous run of segments.
///
/// Each segment starts where the previous one ended. A subpath with no
/// segments is a bare move and contributes nothing when flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subpath {
    start: Point,
    segments: Vec<Segment>,
    closed: bool,
}

impl Subpath {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }

    /// Builds a subpath from segments that already satisfy contiguity.
    ///
    /// Returns `None` for an empty list or when a segment does not start
    /// where its predecessor ended.
    pub fn from_segments(segments: Vec<Segment>, closed: bool) -> Option<Self> {
        let start = segments.first()?.start();
        let contiguous = segments.windows(2).all(|w| w[0].end() == w[1].start());
        if !contiguous {
            return None;
        }
        Some(Self {
            start,
            segments,
            closed,
        })
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The point the next segment must start from.
    pub fn current_point(&self) -> Point {
        self.segments.last().map_or(self.start, Segment::end)
    }

    pub fn line_to(&mut self, to: Point) {
        let from = self.current_point();
        self.segments.push(Segment::line(from, to));
    }

    pub fn quad_to(&mut self, control: Point, to: Point) {
        let from = self.current_point();
        self.segments.push(Segment::quad(from, control, to));
    }

    pub fn cubic_to(&mut self, control1: Point, control2: Point, to: Point) {
        let from = self.current_point();
        self.segments
            .push(Segment::cubic(from, control1, control2, to));
    }

    /// Appends a segment, re-anchoring its start on the current point so
    /// contiguity holds exactly.
    pub fn push_segment(&mut self, segment: Segment) {
        let from = self.current_point();
        let segment = match segment {
            Segment::Line { end, .. } => Segment::line(from, end),
            Segment::QuadCurve { control, end, .. } => Segment::quad(from, control, end),
            Segment::CubicCurve {
                control1,
                control2,
                end,
                ..
            } => Segment::cubic(from, control1, control2, end),
        };
        self.segments.push(segment);
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn map_points<F: Fn(Point) -> Point>(&self, f: F) -> Subpath {
        Subpath {
            start: f(self.start),
            segments: self.segments.iter().map(|s| s.map_points(&f)).collect(),
            closed: self.closed,
        }
    }

    pub fn reversed(&self) -> Subpath {
        Subpath {
            start: self.current_point(),
            segments: self.segments.iter().rev().map(Segment::reversed).collect(),
            closed: self.closed,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.segments
            .iter()
            .fold(Bounds::from_points(&[self.start]), |acc, s| {
                acc.union(&s.bounds())
            })
    }
}

/// An ordered list of subpaths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    subpaths: Vec<Subpath>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PathBuilder {
        PathBuilder::new()
    }

    pub fn from_subpaths(subpaths: Vec<Subpath>) -> Self {
        Self { subpaths }
    }

    /// Line-only path with one subpath per polyline.
    pub fn from_polylines(polylines: &[Polyline]) -> Self {
        let mut builder = PathBuilder::new();
        for polyline in polylines {
            let Some((first, rest)) = polyline.points.split_first() else {
                continue;
            };
            builder.move_to(*first);
            let rest = if polyline.closed && rest.last() == Some(first) {
                &rest[..rest.len() - 1]
            } else {
                rest
            };
            for p in rest {
                builder.line_to(*p);
            }
            if polyline.closed {
                builder.close();
            }
        }
        builder.build()
    }

    /// One closed line subpath through `points`.
    pub fn polygon(points: &[Point]) -> Self {
        let mut builder = PathBuilder::new();
        if let Some((first, rest)) = points.split_first() {
            builder.move_to(*first);
            for p in rest {
                builder.line_to(*p);
            }
            builder.close();
        }
        builder.build()
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    pub fn push(&mut self, subpath: Subpath) {
        self.subpaths.push(subpath);
    }

    pub fn extend(&mut self, other: Path) {
        self.subpaths.extend(other.subpaths);
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(Subpath::is_empty)
    }

    pub fn segment_count(&self) -> usize {
        self.subpaths.iter().map(|s| s.segments.len()).sum()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.subpaths.iter().flat_map(|s| s.segments.iter())
    }

    pub fn map_points<F: Fn(Point) -> Point>(&self, f: F) -> Path {
        Path {
            subpaths: self.subpaths.iter().map(|s| s.map_points(&f)).collect(),
        }
    }

    pub fn transformed(&self, t: &Transform<f64>) -> Path {
        self.map_points(|p| t.transform_point(p.into()).into())
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Path {
        self.map_points(|p| Point::new(p.x + dx, p.y + dy))
    }

    /// Bounding box over all subpaths, `None` for an empty path.
    pub fn bounds(&self) -> Option<Bounds> {
        self.subpaths
            .iter()
            .map(Subpath::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Converts to a `lyon` path for renderers and exporters.
    pub fn to_lyon(&self) -> lyon::path::Path {
        let mut builder = lyon::path::Path::builder();
        for sub in &self.subpaths {
            if sub.is_empty() {
                continue;
            }
            builder.begin(to_lyon_point(sub.start));
            for seg in &sub.segments {
                match *seg {
                    Segment::Line { end, .. } => {
                        builder.line_to(to_lyon_point(end));
                    }
                    Segment::QuadCurve { control, end, .. } => {
                        builder.quadratic_bezier_to(to_lyon_point(control), to_lyon_point(end));
                    }
                    Segment::CubicCurve {
                        control1,
                        control2,
                        end,
                        ..
                    } => {
                        builder.cubic_bezier_to(
                            to_lyon_point(control1),
                            to_lyon_point(control2),
                            to_lyon_point(end),
                        );
                    }
                }
            }
            builder.end(sub.closed);
        }
        builder.build()
    }
}

fn to_lyon_point(p: Point) -> lyon::math::Point {
    lyon::math::point(p.x as f32, p.y as f32)
}

/// Incremental path construction in move/line/curve/close style.
#[derive(Debug, Default)]
pub struct PathBuilder {
    subpaths: Vec<Subpath>,
    current: Option<Subpath>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new subpath, finishing any open one.
    pub fn move_to(&mut self, to: Point) -> &mut Self {
        self.finish_current();
        self.current = Some(Subpath::new(to));
        self
    }

    pub fn line_to(&mut self, to: Point) -> &mut Self {
        self.current_or_origin().line_to(to);
        self
    }

    pub fn quad_to(&mut self, control: Point, to: Point) -> &mut Self {
        self.current_or_origin().quad_to(control, to);
        self
    }

    pub fn cubic_to(&mut self, control1: Point, control2: Point, to: Point) -> &mut Self {
        self.current_or_origin().cubic_to(control1, control2, to);
        self
    }

    pub fn push_segment(&mut self, segment: Segment) -> &mut Self {
        if self.current.is_none() {
            self.current = Some(Subpath::new(segment.start()));
        }
        self.current_or_origin().push_segment(segment);
        self
    }

    /// Closes the current subpath. The next drawing command starts a new
    /// subpath at the closed subpath's start point.
    pub fn close(&mut self) -> &mut Self {
        if let Some(mut sub) = self.current.take() {
            let start = sub.start();
            sub.close();
            self.subpaths.push(sub);
            self.current = Some(Subpath::new(start));
        }
        self
    }

    pub fn build(mut self) -> Path {
        self.finish_current();
        Path {
            subpaths: self.subpaths,
        }
    }

    fn finish_current(&mut self) {
        if let Some(sub) = self.current.take() {
            // A bare move after a close is an artifact of the builder, not
            // a subpath the caller asked for.
            if !sub.is_empty() || self.subpaths.last().map_or(true, |s| s.start() != sub.start())
            {
                self.subpaths.push(sub);
            }
        }
    }

    fn current_or_origin(&mut self) -> &mut Subpath {
        self.current.get_or_insert_with(|| Subpath::new(Point::ORIGIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Path {
        let mut b = Path::builder();
        b.move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(10.0, 0.0))
            .line_to(Point::new(10.0, 10.0))
            .line_to(Point::new(0.0, 10.0))
            .close();
        b.build()
    }

    #[test]
    fn test_builder_contiguity() {
        let path = square();
        assert_eq!(path.subpaths().len(), 1);
        let sub = &path.subpaths()[0];
        assert!(sub.is_closed());
        for w in sub.segments().windows(2) {
            assert_eq!(w[0].end(), w[1].start());
        }
    }

    #[test]
    fn test_close_then_move_keeps_single_subpath() {
        let mut b = Path::builder();
        b.move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(1.0, 0.0))
            .line_to(Point::new(1.0, 1.0))
            .close();
        b.move_to(Point::new(5.0, 5.0)).line_to(Point::new(6.0, 5.0));
        let path = b.build();
        assert_eq!(path.subpaths().len(), 2);
        assert_eq!(path.subpaths()[1].start(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_bare_move_is_kept_as_empty_subpath() {
        let mut b = Path::builder();
        b.move_to(Point::new(3.0, 3.0));
        let path = b.build();
        assert_eq!(path.subpaths().len(), 1);
        assert!(path.is_empty());
    }

    #[test]
    fn test_from_segments_rejects_gaps() {
        let segs = vec![
            Segment::line(Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
            Segment::line(Point::new(2.0, 0.0), Point::new(3.0, 0.0)),
        ];
        assert!(Subpath::from_segments(segs, false).is_none());
    }

    #[test]
    fn test_bounds_and_translate() {
        let path = square().translated(5.0, -2.0);
        let b = path.bounds().unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (5.0, -2.0, 15.0, 8.0));
    }

    #[test]
    fn test_to_lyon_has_same_event_count() {
        let path = square();
        let lyon_path = path.to_lyon();
        // begin + 3 lines + closing end
        assert_eq!(lyon_path.iter().count(), 5);
    }
}

//! Flattened output: ordered point lists joined by straight segments.

use serde::{Deserialize, Serialize};

use super::{Bounds, LineSegment, Point};

/// An ordered list of points joined by straight segments.
///
/// Consecutive point pairs are the polyline's line segments. When a closed
/// polyline needed a closing segment, its last point repeats its first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Polyline {
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        Self { points, closed }
    }

    pub fn open(points: Vec<Point>) -> Self {
        Self::new(points, false)
    }

    /// A closed loop; the first point is repeated at the end if needed.
    pub fn closed_loop(mut points: Vec<Point>) -> Self {
        if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
            if points.len() > 1 && first != last {
                points.push(first);
            }
        }
        Self::new(points, true)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn segments(&self) -> impl Iterator<Item = LineSegment> + '_ {
        self.points
            .windows(2)
            .map(|w| LineSegment::new(w[0], w[1]))
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    /// Vertices without the repeated closing point.
    pub fn vertices(&self) -> &[Point] {
        match self.points.as_slice() {
            [first, rest @ .., last] if self.closed && first == last && !rest.is_empty() => {
                &self.points[..self.points.len() - 1]
            }
            pts => pts,
        }
    }

    /// Shoelace area over the vertex ring. Positive for counter-clockwise
    /// order in a y-up frame.
    pub fn signed_area(&self) -> f64 {
        let v = self.vertices();
        if v.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..v.len() {
            let a = v[i];
            let b = v[(i + 1) % v.len()];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    pub fn reversed(&self) -> Polyline {
        let mut points = self.points.clone();
        points.reverse();
        Polyline::new(points, self.closed)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        if self.points.is_empty() {
            None
        } else {
            Some(Bounds::from_points(&self.points))
        }
    }

    /// Smallest distance from `p` to any segment of the polyline.
    pub fn distance_to_point(&self, p: &Point) -> f64 {
        match self.points.as_slice() {
            [] => f64::INFINITY,
            [only] => only.distance_to(p),
            _ => self
                .segments()
                .map(|s| s.distance_to_point(p))
                .fold(f64::INFINITY, f64::min),
        }
    }

    /// Even-odd containment test against the vertex ring.
    pub fn contains_point(&self, p: &Point) -> bool {
        ring_contains(self.vertices(), p)
    }
}

/// Even-odd ray cast of `p` against a closed ring of vertices.
pub fn ring_contains(ring: &[Point], p: &Point) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

//! DXF-style bulge arcs.
//!
//! A bulge vertex stores `tan(included_angle / 4)` for the arc running from
//! it to the next vertex. Positive bulges sweep counter-clockwise, zero is a
//! straight line.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use crate::geometry::{Path, PathBuilder, Point, Polyline, Segment};
use crate::tessellate::{MAX_CHORDS, MIN_CHORDS};

/// Bulges smaller than this are treated as straight lines.
const STRAIGHT_BULGE: f64 = 1e-9;

/// A polyline vertex with the bulge of the segment leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulgeVertex {
    pub point: Point,
    #[serde(default)]
    pub bulge: f64,
}

impl BulgeVertex {
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self {
            point: Point::new(x, y),
            bulge,
        }
    }
}

/// A circular arc reconstructed from a bulge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulgeArc {
    pub start: Point,
    pub end: Point,
    pub center: Point,
    pub radius: f64,
    /// Angle of `start` around `center`, radians
    pub start_angle: f64,
    /// Signed sweep, radians; positive is counter-clockwise
    pub sweep: f64,
}

impl BulgeArc {
    /// Rebuilds the arc between `start` and `end`. Returns `None` when the
    /// bulge is (near) zero or the chord is degenerate, in which case the
    /// segment is a straight line.
    pub fn from_bulge(start: Point, end: Point, bulge: f64) -> Option<Self> {
        let chord = end - start;
        let chord_len = chord.length();
        if bulge.abs() < STRAIGHT_BULGE || chord_len <= f64::EPSILON {
            return None;
        }

        let sweep = 4.0 * bulge.atan();
        let radius = chord_len / (2.0 * (sweep / 2.0).sin().abs());

        // Signed distance from the chord midpoint to the center, along the
        // chord's left normal.
        let offset = (chord_len / 2.0) * (1.0 - bulge * bulge) / (2.0 * bulge);
        let normal = chord.perp().scaled(1.0 / chord_len);
        let center = start.midpoint(&end) + normal * offset;

        let start_angle = (start.y - center.y).atan2(start.x - center.x);
        Some(Self {
            start,
            end,
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    pub fn point_at(&self, angle: f64) -> Point {
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Splits the arc into cubic Béziers of at most a quarter turn each.
    /// The first piece starts at `start` and the last ends at `end` exactly.
    pub fn to_cubics(&self) -> Vec<Segment> {
        let pieces = (self.sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = self.sweep / pieces as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan() * self.radius;

        let mut segments = Vec::with_capacity(pieces);
        let mut from = self.start;
        for i in 0..pieces {
            let a0 = self.start_angle + step * i as f64;
            let a1 = a0 + step;
            let to = if i + 1 == pieces {
                self.end
            } else {
                self.point_at(a1)
            };
            let c1 = from + Point::new(-a0.sin(), a0.cos()) * k;
            let c2 = to - Point::new(-a1.sin(), a1.cos()) * k;
            segments.push(Segment::cubic(from, c1, c2, to));
            from = to;
        }
        segments
    }

    /// Appends the arc's points after `start`, scaled, with chords no longer
    /// than `tolerance` and never fewer than the chord floor.
    pub fn flatten_into(&self, scale: f64, tolerance: f64, out: &mut Vec<Point>) {
        let estimate = self.length() * scale.abs() / tolerance;
        let chords = if estimate.is_finite() {
            (estimate.ceil() as usize).clamp(MIN_CHORDS, MAX_CHORDS)
        } else {
            MAX_CHORDS
        };
        for i in 1..chords {
            let angle = self.start_angle + self.sweep * i as f64 / chords as f64;
            out.push(self.point_at(angle).scaled(scale));
        }
        out.push(self.end.scaled(scale));
    }
}

/// Converts bulge vertices to a path of lines and cubic arcs.
pub fn bulge_polyline_to_path(vertices: &[BulgeVertex], closed: bool) -> Path {
    let mut builder = PathBuilder::new();
    let Some(first) = vertices.first() else {
        return builder.build();
    };
    builder.move_to(first.point);

    for (from, to) in bulge_spans(vertices, closed) {
        match BulgeArc::from_bulge(from.point, to.point, from.bulge) {
            Some(arc) => {
                for segment in arc.to_cubics() {
                    builder.push_segment(segment);
                }
            }
            None => {
                builder.line_to(to.point);
            }
        }
    }

    if closed {
        builder.close();
    }
    builder.build()
}

/// Flattens bulge vertices directly into a polyline.
pub fn flatten_bulge_polyline(
    vertices: &[BulgeVertex],
    closed: bool,
    scale: f64,
    tolerance: f64,
) -> Polyline {
    let Some(first) = vertices.first() else {
        return Polyline::default();
    };
    let mut points = vec![first.point.scaled(scale)];
    for (from, to) in bulge_spans(vertices, closed) {
        match BulgeArc::from_bulge(from.point, to.point, from.bulge) {
            Some(arc) => arc.flatten_into(scale, tolerance, &mut points),
            None => points.push(to.point.scaled(scale)),
        }
    }

    if closed {
        let start = points[0];
        if let Some(last) = points.last_mut() {
            if last.distance_to(&start) <= f64::EPSILON {
                *last = start;
            } else {
                points.push(start);
            }
        }
    }
    Polyline::new(points, closed)
}

/// Vertex pairs for each span; closed polylines wrap back to the first
/// vertex unless the last vertex already sits on it. Repeated vertices
/// produce no span.
fn bulge_spans(
    vertices: &[BulgeVertex],
    closed: bool,
) -> impl Iterator<Item = (BulgeVertex, BulgeVertex)> + '_ {
    let wrap = closed
        && vertices.len() > 1
        && vertices[0].point != vertices[vertices.len() - 1].point;
    let closing = if wrap {
        Some((vertices[vertices.len() - 1], vertices[0]))
    } else {
        None
    };
    vertices
        .windows(2)
        .map(|w| (w[0], w[1]))
        .chain(closing)
        .filter(|(from, to)| from.point != to.point)
}

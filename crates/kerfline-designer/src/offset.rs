//! Toolpath offsetting at a constant tool radius.
//!
//! The default join meets consecutive offset segments at the intersection of
//! their supporting lines. Rounded joins are available through
//! `cavalier_contours` for callers that ask for them.

use std::panic;

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline as CavPolyline};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bulge::{flatten_bulge_polyline, BulgeVertex};
use crate::geometry::{Path, Point, Polyline};

/// Offset lines whose directions differ by less than this sine are treated
/// as parallel and joined with a connector.
const PARALLEL_SINE: f64 = 1e-3;

/// Consecutive points closer than this are merged before offsetting.
const DUPLICATE_POINT: f64 = 1e-9;

/// Which side of the outline the tool runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OffsetSide {
    #[default]
    Inset,
    Outset,
}

impl OffsetSide {
    pub fn from_outward(outward: bool) -> Self {
        if outward {
            OffsetSide::Outset
        } else {
            OffsetSide::Inset
        }
    }

    pub fn is_outward(&self) -> bool {
        matches!(self, OffsetSide::Outset)
    }

    /// +1 for the left of travel, -1 for the right.
    fn normal_sign(&self) -> f64 {
        match self {
            OffsetSide::Inset => 1.0,
            OffsetSide::Outset => -1.0,
        }
    }
}

/// How consecutive offset segments are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OffsetJoin {
    /// Segments meet where their supporting lines intersect.
    #[default]
    Line,
    /// Convex corners are rounded with arcs of the tool radius.
    Round,
}

/// Offsets flattened outlines by a tool radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolpathOffsetter {
    pub join: OffsetJoin,
    /// Chord tolerance used to flatten arcs of rounded joins
    pub tolerance: f64,
}

impl Default for ToolpathOffsetter {
    fn default() -> Self {
        Self {
            join: OffsetJoin::Line,
            tolerance: kerfline_core::EngineConfig::default().tolerance,
        }
    }
}

impl ToolpathOffsetter {
    pub fn new(join: OffsetJoin, tolerance: f64) -> Self {
        Self { join, tolerance }
    }

    /// Offsets every polyline of `outline` and returns the result as a line
    /// path. A zero radius returns the outline unchanged.
    pub fn offset(&self, outline: &[Polyline], radius: f64, side: OffsetSide) -> Path {
        Path::from_polylines(&self.offset_polylines(outline, radius, side))
    }

    pub fn offset_polylines(
        &self,
        outline: &[Polyline],
        radius: f64,
        side: OffsetSide,
    ) -> Vec<Polyline> {
        let radius = radius.abs();
        if radius < f64::EPSILON {
            return outline.to_vec();
        }

        let result: Vec<Polyline> = outline
            .iter()
            .flat_map(|polyline| match self.join {
                OffsetJoin::Line => offset_line_join(polyline, radius, side).into_iter().collect(),
                OffsetJoin::Round => self.offset_round_join(polyline, radius, side),
            })
            .collect();
        debug!(
            "Offset {} polylines by {} ({:?}, {:?} join) into {}",
            outline.len(),
            radius,
            side,
            self.join,
            result.len()
        );
        result
    }

    /// Closed results keep the source winding, as with line joins.
    fn offset_round_join(&self, polyline: &Polyline, radius: f64, side: OffsetSide) -> Vec<Polyline> {
        let points = dedupe(polyline);
        if points.len() < 2 {
            return Vec::new();
        }
        let closed = polyline.closed && points.len() >= 3;

        let mut pline = CavPolyline::new();
        for p in &points {
            pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
        }
        pline.set_is_closed(closed);
        let reversed = closed && pline.area() < 0.0;
        if reversed {
            pline.invert_direction_mut();
        }

        let value = radius * side.normal_sign();
        let offsets = match panic::catch_unwind(panic::AssertUnwindSafe(|| pline.parallel_offset(value))) {
            Ok(offsets) => offsets,
            Err(_) => {
                warn!("Panic during parallel offset, falling back to line joins");
                return offset_line_join(polyline, radius, side).into_iter().collect();
            }
        };

        offsets
            .iter()
            .map(|result| {
                let vertices: Vec<BulgeVertex> = result
                    .vertex_data
                    .iter()
                    .map(|v| BulgeVertex::new(v.x, v.y, v.bulge))
                    .collect();
                let flat = flatten_bulge_polyline(&vertices, result.is_closed(), 1.0, self.tolerance);
                if reversed && flat.closed {
                    flat.reversed()
                } else {
                    flat
                }
            })
            .collect()
    }
}

/// Offsets `outline` with line joins.
pub fn offset(outline: &[Polyline], radius: f64, side: OffsetSide) -> Path {
    ToolpathOffsetter::default().offset(outline, radius, side)
}

/// Returns a counter-clockwise copy of a closed polyline and whether the
/// source had to be reversed. Open polylines are returned unchanged.
pub fn normalize_winding(polyline: &Polyline) -> (Polyline, bool) {
    if !polyline.closed {
        return (polyline.clone(), false);
    }
    let mut pline = CavPolyline::new();
    for p in polyline.vertices() {
        pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    pline.set_is_closed(true);
    if pline.area() < 0.0 {
        (polyline.reversed(), true)
    } else {
        (polyline.clone(), false)
    }
}

/// Line-join offset of one polyline. Closed polylines keep their source
/// winding in the output.
fn offset_line_join(polyline: &Polyline, radius: f64, side: OffsetSide) -> Option<Polyline> {
    let (normalized, reversed) = normalize_winding(polyline);
    let points = dedupe(&normalized);
    let closed = normalized.closed && points.len() >= 3;
    if points.len() < 2 {
        return None;
    }

    let segment_count = if closed { points.len() } else { points.len() - 1 };
    let sign = side.normal_sign();
    let mut lines = Vec::with_capacity(segment_count);
    for i in 0..segment_count {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let Some(dir) = (b - a).normalized() else {
            continue;
        };
        let shift = dir.perp() * (radius * sign);
        lines.push(OffsetLine {
            start: a + shift,
            end: b + shift,
            dir,
        });
    }
    if lines.is_empty() {
        return None;
    }

    let mut out = Vec::with_capacity(lines.len() + 2);
    if closed {
        for j in 0..lines.len() {
            let prev = &lines[(j + lines.len() - 1) % lines.len()];
            join_into(prev, &lines[j], &mut out);
        }
        let first = out[0];
        out.push(first);
    } else {
        out.push(lines[0].start);
        for j in 1..lines.len() {
            join_into(&lines[j - 1], &lines[j], &mut out);
        }
        if let Some(last) = lines.last() {
            out.push(last.end);
        }
    }

    let result = Polyline::new(out, closed);
    Some(if reversed { result.reversed() } else { result })
}

struct OffsetLine {
    start: Point,
    end: Point,
    dir: Point,
}

/// Pushes the junction between `prev` and `next`.
fn join_into(prev: &OffsetLine, next: &OffsetLine, out: &mut Vec<Point>) {
    let denom = prev.dir.cross(&next.dir);
    if denom.abs() < PARALLEL_SINE {
        out.push(prev.end);
        if !prev.end.approx_eq(&next.start, DUPLICATE_POINT) {
            out.push(next.start);
        }
        return;
    }
    let t = (next.start - prev.start).cross(&next.dir) / denom;
    out.push(prev.start + prev.dir * t);
}

/// Polyline vertices with consecutive duplicates (and a duplicate closing
/// point) removed.
fn dedupe(polyline: &Polyline) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::with_capacity(polyline.len());
    for p in polyline.vertices() {
        if points
            .last()
            .map_or(true, |last| !last.approx_eq(p, DUPLICATE_POINT))
        {
            points.push(*p);
        }
    }
    if polyline.closed && points.len() > 1 {
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            if first.approx_eq(last, DUPLICATE_POINT) {
                points.pop();
            }
        }
    }
    points
}

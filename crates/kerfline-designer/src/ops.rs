//! Area boolean operations backed by `csgrs` sketches.

use csgrs::sketch::Sketch;
use csgrs::traits::CSG;

use crate::geometry::{ring_contains, Path, Point, Polyline};
use crate::tessellate::Tessellator;

/// Ring points closer than this are merged when reading sketches back.
const RING_DEDUPE: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
}

pub fn perform_boolean(a: &Sketch<()>, b: &Sketch<()>, op: BooleanOp) -> Sketch<()> {
    match op {
        BooleanOp::Union => a.union(b),
        BooleanOp::Difference => a.difference(b),
        BooleanOp::Intersection => a.intersection(b),
    }
}

/// Filled area of a path: its closed subpaths flattened with `tolerance`
/// and combined even-odd, so nested rings become holes.
pub fn path_to_sketch(path: &Path, tolerance: f64) -> Sketch<()> {
    let polylines = Tessellator::new(tolerance).flatten(path, 1.0);
    polylines_to_sketch(&polylines)
}

/// Even-odd area of the closed polylines. Open polylines enclose nothing.
pub fn polylines_to_sketch(polylines: &[Polyline]) -> Sketch<()> {
    let rings: Vec<&[Point]> = polylines
        .iter()
        .filter(|p| p.closed && p.vertices().len() >= 3)
        .map(|p| p.vertices())
        .collect();

    let mut nested: Vec<(usize, &[Point])> = rings
        .iter()
        .enumerate()
        .map(|(i, ring)| {
            let depth = rings
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && ring_contains(other, &ring[0]))
                .count();
            (depth, *ring)
        })
        .collect();
    nested.sort_by_key(|(depth, _)| *depth);

    nested
        .into_iter()
        .fold(Sketch::new(), |area, (depth, ring)| {
            let pts: Vec<[f64; 2]> = ring.iter().map(|p| [p.x, p.y]).collect();
            let piece: Sketch<()> = Sketch::polygon(&pts, None);
            if depth % 2 == 0 {
                area.union(&piece)
            } else {
                area.difference(&piece)
            }
        })
}

/// Closed polyline per sketch ring: each exterior followed by its holes.
pub fn sketch_to_polylines(sketch: &Sketch<()>) -> Vec<Polyline> {
    let mut polylines = Vec::new();
    let mp = sketch.to_multipolygon();
    for poly in mp.0 {
        let exterior: Vec<Point> = poly.exterior().0.iter().map(|c| Point::new(c.x, c.y)).collect();
        if let Some(ring) = clean_ring(&exterior) {
            polylines.push(ring);
        }
        for interior in poly.interiors() {
            let hole: Vec<Point> = interior.0.iter().map(|c| Point::new(c.x, c.y)).collect();
            if let Some(ring) = clean_ring(&hole) {
                polylines.push(ring);
            }
        }
    }
    polylines
}

pub fn sketch_to_path(sketch: &Sketch<()>) -> Path {
    Path::from_polylines(&sketch_to_polylines(sketch))
}

/// Enclosed area: exteriors minus holes, whatever their winding.
pub fn sketch_area(sketch: &Sketch<()>) -> f64 {
    let ring_area = |coords: &[Point]| {
        clean_ring(coords).map_or(0.0, |ring| ring.signed_area().abs())
    };
    sketch
        .to_multipolygon()
        .0
        .iter()
        .map(|poly| {
            let exterior: Vec<Point> =
                poly.exterior().0.iter().map(|c| Point::new(c.x, c.y)).collect();
            let holes: f64 = poly
                .interiors()
                .iter()
                .map(|interior| {
                    let hole: Vec<Point> =
                        interior.0.iter().map(|c| Point::new(c.x, c.y)).collect();
                    ring_area(&hole)
                })
                .sum();
            ring_area(&exterior) - holes
        })
        .sum()
}

fn clean_ring(points: &[Point]) -> Option<Polyline> {
    let mut ring: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if ring
            .last()
            .map_or(true, |last| last.distance_to(p) >= RING_DEDUPE)
        {
            ring.push(*p);
        }
    }
    if ring.len() > 1 {
        if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
            if first.distance_to(last) < RING_DEDUPE {
                ring.pop();
            }
        }
    }
    if ring.len() < 3 {
        return None;
    }
    Some(Polyline::closed_loop(ring))
}

//! Corner rounding through area booleans.
//!
//! Each detected corner is replaced by a tangent arc of the requested
//! radius. A quadrilateral patch covering the corner is cut from (or added
//! to) the filled area, and a disc at the arc center is added back (or cut).

use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use kerfline_core::EngineConfig;
use nalgebra::{Matrix4, Vector3};
use tracing::debug;

use crate::geometry::{Path, Point, Polyline};
use crate::ops::{perform_boolean, polylines_to_sketch, sketch_to_path, sketch_to_polylines, BooleanOp};
use crate::tessellate::Tessellator;

/// A corner vertex with its neighbours along the outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub prev: Point,
    pub vertex: Point,
    pub next: Point,
}

impl Corner {
    /// Tangent points on the incoming and outgoing edges and the arc center.
    pub fn arc_points(&self, radius: f64) -> Option<(Point, Point, Point)> {
        let to_prev = (self.prev - self.vertex).normalized()?;
        let to_next = (self.next - self.vertex).normalized()?;
        let p1b = self.vertex + to_prev * radius;
        let p3b = self.vertex + to_next * radius;
        let center = p1b + p3b - self.vertex;
        Some((p1b, p3b, center))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerRounder {
    /// Chord tolerance for flattening curved input
    pub tolerance: f64,
    /// Largest |cos| between edges still treated as a right angle
    pub slope_epsilon: f64,
    /// Relative growth of the patch past the tangent points
    pub seam_epsilon: f64,
    /// Disc polygon segment count
    pub circle_segments: usize,
}

impl Default for CornerRounder {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl CornerRounder {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            slope_epsilon: config.corner_slope_epsilon,
            seam_epsilon: config.corner_seam_epsilon,
            circle_segments: config.circle_segments,
        }
    }

    /// Corners of the closed polylines with both edges at least `radius`
    /// long.
    pub fn detect(&self, polylines: &[Polyline], radius: f64) -> Vec<Corner> {
        let mut corners = Vec::new();
        for polyline in polylines.iter().filter(|p| p.closed) {
            let ring = polyline.vertices();
            let n = ring.len();
            if n < 3 {
                continue;
            }
            for i in 0..n {
                let prev = ring[(i + n - 1) % n];
                let vertex = ring[i];
                let next = ring[(i + 1) % n];
                let d1 = vertex - prev;
                let d2 = next - vertex;
                let (l1, l2) = (d1.length(), d2.length());
                if l1 < radius || l2 < radius || l1 <= f64::EPSILON || l2 <= f64::EPSILON {
                    continue;
                }
                if d1.dot(&d2).abs() / (l1 * l2) < self.slope_epsilon {
                    corners.push(Corner { prev, vertex, next });
                }
            }
        }
        corners
    }

    /// Rounds every detected corner of the closed subpaths in `path`.
    /// Open subpaths are carried over unchanged. A radius of zero or less
    /// returns the input.
    pub fn round(&self, path: &Path, radius: f64) -> Path {
        if radius <= 0.0 {
            return path.clone();
        }

        let polylines = Tessellator::new(self.tolerance).flatten(path, 1.0);
        let corners = self.detect(&polylines, radius);
        if corners.is_empty() {
            return path.clone();
        }

        let mut area = polylines_to_sketch(&polylines);
        for corner in &corners {
            area = self.round_corner(area, corner, radius);
        }
        debug!("Rounded {} corners with radius {}", corners.len(), radius);

        let mut result = sketch_to_path(&area);
        for open in path.subpaths().iter().filter(|s| !s.is_closed() && !s.is_empty()) {
            result.push(open.clone());
        }
        result
    }

    fn round_corner(&self, area: Sketch<()>, corner: &Corner, radius: f64) -> Sketch<()> {
        let Some((p1b, p3b, center)) = corner.arc_points(radius) else {
            return area;
        };

        let grow = 1.0 + self.seam_epsilon;
        let patch_points: Vec<[f64; 2]> = [center, p1b, corner.vertex, p3b]
            .iter()
            .map(|p| {
                let q = center + (*p - center) * grow;
                [q.x, q.y]
            })
            .collect();
        let patch: Sketch<()> = Sketch::polygon(&patch_points, None);

        let disc: Sketch<()> = Sketch::circle(radius, self.circle_segments, None);
        let disc = disc.transform(&Matrix4::new_translation(&Vector3::new(center.x, center.y, 0.0)));

        let rings = sketch_to_polylines(&area);
        let midpoint = p1b.midpoint(&p3b);
        let inside = rings.iter().filter(|r| r.contains_point(&midpoint)).count() % 2 == 1;

        if inside {
            let cut = perform_boolean(&area, &patch, BooleanOp::Difference);
            perform_boolean(&cut, &disc, BooleanOp::Union)
        } else {
            let filled = perform_boolean(&area, &patch, BooleanOp::Union);
            perform_boolean(&filled, &disc, BooleanOp::Difference)
        }
    }
}

/// Rounds corners with the default settings.
pub fn round_corners(path: &Path, radius: f64) -> Path {
    CornerRounder::default().round(path, radius)
}

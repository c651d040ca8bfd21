//! Geometric primitives shared by every stage of the engine.
//!
//! - [`Point`] and [`PointKey`] (reduced-precision identity)
//! - [`Segment`] (line, quadratic and cubic curves) and [`LineSegment`]
//! - [`Subpath`] and [`Path`], built with [`PathBuilder`]
//! - [`Polyline`], the output of flattening and stitching

mod path;
mod point;
mod polyline;
mod segment;

pub use path::{Path, PathBuilder, Subpath};
pub use point::{Point, PointKey};
pub use polyline::{ring_contains, Polyline};
pub use segment::{LineSegment, Segment};

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Box around a non-empty point list. An empty list yields an inverted
    /// box that any union replaces.
    pub fn from_points(points: &[Point]) -> Self {
        points.iter().fold(
            Bounds::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |b, p| b.including(p),
        )
    }

    pub fn including(&self, p: &Point) -> Self {
        Bounds::new(
            self.min_x.min(p.x),
            self.min_y.min(p.y),
            self.max_x.max(p.x),
            self.max_y.max(p.y),
        )
    }

    pub fn union(&self, other: &Bounds) -> Self {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, p: &Point, tolerance: f64) -> bool {
        p.x >= self.min_x - tolerance
            && p.x <= self.max_x + tolerance
            && p.y >= self.min_y - tolerance
            && p.y <= self.max_y + tolerance
    }
}

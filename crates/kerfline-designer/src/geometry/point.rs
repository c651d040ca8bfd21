//! Points and the reduced-precision point key used for stitching.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A position (or displacement) in design units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Length when the point is read as a vector.
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len <= f64::EPSILON {
            None
        } else {
            Some(Point::new(self.x / len, self.y / len))
        }
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    pub fn cross(&self, other: &Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// The vector rotated a quarter turn towards positive angles.
    pub fn perp(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn scaled(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    /// True when both coordinates match within `eps`.
    pub fn approx_eq(&self, other: &Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }

    /// Distance from this point to the closed segment `a`-`b`.
    pub fn distance_to_segment(&self, a: &Point, b: &Point) -> f64 {
        let ab = *b - *a;
        let len_sq = ab.dot(&ab);
        if len_sq <= f64::EPSILON * f64::EPSILON {
            return self.distance_to(a);
        }
        let t = ((*self - *a).dot(&ab) / len_sq).clamp(0.0, 1.0);
        self.distance_to(&a.lerp(b, t))
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        self.scaled(rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<Point> for lyon::geom::Point<f64> {
    fn from(p: Point) -> Self {
        lyon::geom::point(p.x, p.y)
    }
}

impl From<lyon::geom::Point<f64>> for Point {
    fn from(p: lyon::geom::Point<f64>) -> Self {
        Point::new(p.x, p.y)
    }
}

/// A point rounded to a fixed number of decimal places.
///
/// Two points with the same key are treated as the same vertex when
/// reconnecting fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointKey {
    x: i64,
    y: i64,
}

impl PointKey {
    pub fn new(p: &Point, precision: u32) -> Self {
        let factor = 10f64.powi(precision as i32);
        Self {
            x: (p.x * factor).round() as i64,
            y: (p.y * factor).round() as i64,
        }
    }
}

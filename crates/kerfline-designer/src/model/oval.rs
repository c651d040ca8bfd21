//! Ellipses as four cubic quarter arcs.

use crate::geometry::{Path, PathBuilder, Point};

/// Control-point distance for a cubic quarter circle of unit radius.
pub const KAPPA: f64 = 0.552_284_749_8;

/// Ellipse centered on the origin, counter-clockwise from `(rx, 0)`.
pub fn build_oval(width: f64, height: f64) -> Path {
    let rx = width / 2.0;
    let ry = height / 2.0;
    let kx = rx * KAPPA;
    let ky = ry * KAPPA;

    let mut builder = PathBuilder::new();
    builder
        .move_to(Point::new(rx, 0.0))
        .cubic_to(Point::new(rx, ky), Point::new(kx, ry), Point::new(0.0, ry))
        .cubic_to(Point::new(-kx, ry), Point::new(-rx, ky), Point::new(-rx, 0.0))
        .cubic_to(Point::new(-rx, -ky), Point::new(-kx, -ry), Point::new(0.0, -ry))
        .cubic_to(Point::new(kx, -ry), Point::new(rx, -ky), Point::new(rx, 0.0))
        .close();
    builder.build()
}

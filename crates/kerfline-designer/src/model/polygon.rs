use std::f64::consts::PI;

use crate::geometry::{Path, Point};

/// Regular polygon with circumradius `radius`, first vertex on the +x axis.
pub fn build_polygon(sides: usize, radius: f64) -> Path {
    let sides = sides.max(3);
    let points: Vec<Point> = (0..sides)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / sides as f64;
            Point::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect();
    Path::polygon(&points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hexagon_vertices_on_circle() {
        let path = build_polygon(6, 3.0);
        let pl = &crate::tessellate::flatten(&path, 1.0, 0.1)[0];
        assert_eq!(pl.vertices().len(), 6);
        assert!(pl.vertices().iter().all(|p| (p.length() - 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_too_few_sides_clamps_to_triangle() {
        assert_eq!(build_polygon(1, 1.0).subpaths()[0].segments().len(), 2);
    }
}

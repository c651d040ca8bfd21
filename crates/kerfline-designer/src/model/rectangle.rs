//! Rectangles, optionally with rounded corners.

use std::f64::consts::FRAC_PI_8;

use crate::bulge::{bulge_polyline_to_path, BulgeVertex};
use crate::geometry::{Path, Point};

/// Rectangle centered on the origin. A positive `corner_radius` (clamped to
/// half the shorter side) rounds every corner with a quarter arc.
pub fn build_rectangle(width: f64, height: f64, corner_radius: f64) -> Path {
    let hw = width / 2.0;
    let hh = height / 2.0;
    let r = corner_radius.clamp(0.0, hw.min(hh));

    if r <= 0.0 {
        return Path::polygon(&[
            Point::new(-hw, -hh),
            Point::new(hw, -hh),
            Point::new(hw, hh),
            Point::new(-hw, hh),
        ]);
    }

    let b = FRAC_PI_8.tan();
    let vertices = [
        BulgeVertex::new(-hw + r, -hh, 0.0),
        BulgeVertex::new(hw - r, -hh, b),
        BulgeVertex::new(hw, -hh + r, 0.0),
        BulgeVertex::new(hw, hh - r, b),
        BulgeVertex::new(hw - r, hh, 0.0),
        BulgeVertex::new(-hw + r, hh, b),
        BulgeVertex::new(-hw, hh - r, 0.0),
        BulgeVertex::new(-hw, -hh + r, b),
    ];
    bulge_polyline_to_path(&vertices, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rectangle_bounds() {
        let b = build_rectangle(4.0, 2.0, 0.0).bounds().unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-2.0, -1.0, 2.0, 1.0));
    }

    #[test]
    fn test_rounded_rectangle_area() {
        let path = build_rectangle(10.0, 6.0, 1.0);
        let pl = &crate::tessellate::flatten(&path, 1.0, 0.001)[0];
        let expected = 60.0 - (4.0 - std::f64::consts::PI);
        assert!((pl.signed_area() - expected).abs() < 5e-3);
    }

    #[test]
    fn test_slot_radius_is_clamped() {
        let path = build_rectangle(10.0, 4.0, 5.0);
        let b = path.bounds().unwrap();
        assert!((b.height() - 4.0).abs() < 1e-9);
        assert!((b.width() - 10.0).abs() < 1e-9);
    }
}

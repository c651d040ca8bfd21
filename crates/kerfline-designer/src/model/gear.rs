//! Involute spur gears.

use std::f64::consts::PI;

use super::oval::build_oval;
use crate::geometry::{Path, Point};

/// Involute gear outline centered on the origin.
///
/// Tooth flanks are sampled at `steps + 1` points along the involute from
/// the base circle to the addendum circle. Where the root circle lies
/// inside the base circle each flank starts with a radial line from the
/// root. A positive `hole_radius` adds a reversed circle so even-odd and
/// nonzero fills both leave it open.
pub fn build_spur_gear(
    module: f64,
    teeth: usize,
    pressure_angle_deg: f64,
    hole_radius: f64,
    steps: usize,
) -> Path {
    let teeth = teeth.max(3);
    let steps = steps.max(1);

    let pitch_radius = module * teeth as f64 / 2.0;
    let outer_radius = pitch_radius + module;
    let root_radius = pitch_radius - 1.25 * module;
    let base_radius = pitch_radius * pressure_angle_deg.to_radians().cos();
    let angle_per_tooth = 2.0 * PI / teeth as f64;
    let half_thickness = PI / (2.0 * teeth as f64);

    // Roll angle at which the involute reaches a radius.
    let roll = |r: f64| ((r / base_radius).powi(2) - 1.0).max(0.0).sqrt();
    let t_max = roll(outer_radius);
    let t_pitch = roll(pitch_radius);
    let phi_pitch = involute_angle(t_pitch);

    let mut points = Vec::with_capacity(teeth * (2 * steps + 4));
    for i in 0..teeth {
        let center_angle = i as f64 * angle_per_tooth;

        let flank = |sign: f64, j: usize| {
            let t = j as f64 / steps as f64 * t_max;
            let r = base_radius * (1.0 + t * t).sqrt();
            let angle = center_angle + sign * (half_thickness + phi_pitch - involute_angle(t));
            Point::new(r * angle.cos(), r * angle.sin())
        };

        let leading: Vec<Point> = (0..=steps).map(|j| flank(-1.0, j)).collect();
        if root_radius < base_radius {
            points.push(radial(leading[0], root_radius));
        }
        points.extend(leading);

        let trailing: Vec<Point> = (0..=steps).rev().map(|j| flank(1.0, j)).collect();
        let last = trailing[trailing.len() - 1];
        points.extend(trailing);
        if root_radius < base_radius {
            points.push(radial(last, root_radius));
        }
    }

    let mut path = Path::polygon(&points);
    if hole_radius > 0.0 {
        for hole in build_oval(2.0 * hole_radius, 2.0 * hole_radius).subpaths() {
            path.push(hole.reversed());
        }
    }
    path
}

/// Polar angle of the involute point at roll angle `t`.
fn involute_angle(t: f64) -> f64 {
    (t.sin() - t * t.cos()).atan2(t.cos() + t * t.sin())
}

fn radial(p: Point, radius: f64) -> Point {
    let angle = p.y.atan2(p.x);
    Point::new(radius * angle.cos(), radius * angle.sin())
}

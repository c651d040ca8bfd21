//! Curve flattening.
//!
//! Turns paths into polylines whose chords are no longer than a tolerance.
//! Curves are sampled at uniform parameter steps; the chord count comes from
//! the control-polygon length, which never underestimates the arc length.

use kerfline_core::EngineConfig;
use tracing::{trace, warn};

use crate::geometry::{Path, Point, Polyline, Segment, Subpath};

/// Fewest chords a curve segment is ever split into.
pub const MIN_CHORDS: usize = 3;

/// Upper bound on chords per segment, reached only with a degenerate
/// tolerance.
pub const MAX_CHORDS: usize = 100_000;

/// Flattens paths into line-segment polylines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tessellator {
    /// Maximum chord length in output (post-scale) units
    pub tolerance: f64,
    /// Minimum chord count for curve segments
    pub min_chords: usize,
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new(EngineConfig::default().tolerance)
    }
}

impl Tessellator {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            min_chords: MIN_CHORDS,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            min_chords: config.min_chords.max(1),
        }
    }

    /// Flattens every non-empty subpath of `path`, scaling coordinates by
    /// `scale` first.
    pub fn flatten(&self, path: &Path, scale: f64) -> Vec<Polyline> {
        let polylines: Vec<Polyline> = path
            .subpaths()
            .iter()
            .filter_map(|sub| self.flatten_subpath(sub, scale))
            .collect();
        trace!(
            subpaths = path.subpaths().len(),
            polylines = polylines.len(),
            "Flattened path"
        );
        polylines
    }

    /// Flattens one subpath. A bare move yields `None`.
    pub fn flatten_subpath(&self, subpath: &Subpath, scale: f64) -> Option<Polyline> {
        if subpath.is_empty() {
            return None;
        }

        let first = subpath.start().scaled(scale);
        let mut points = vec![first];
        for segment in subpath.segments() {
            self.flatten_segment_into(segment, scale, &mut points);
        }

        if subpath.is_closed() {
            if let Some(last) = points.last_mut() {
                if last.distance_to(&first) > f64::EPSILON {
                    points.push(first);
                } else {
                    *last = first;
                }
            }
        }

        Some(Polyline::new(points, subpath.is_closed()))
    }

    /// Number of chords a segment is split into at the given scale.
    pub fn chord_count(&self, segment: &Segment, scale: f64) -> usize {
        if !segment.is_curve() {
            return 1;
        }
        let estimate = segment.control_polygon_length() * scale.abs() / self.tolerance;
        let chords = if estimate.is_finite() {
            estimate.ceil() as usize
        } else {
            warn!("Non-finite chord estimate, using {} chords", MAX_CHORDS);
            MAX_CHORDS
        };
        chords.clamp(self.min_chords, MAX_CHORDS)
    }

    /// Appends the segment's points after its start point to `out`. The
    /// final point is always the exact scaled end point.
    pub fn flatten_segment_into(&self, segment: &Segment, scale: f64, out: &mut Vec<Point>) {
        let scaled = segment.map_points(|p| p.scaled(scale));
        let chords = self.chord_count(segment, scale);
        for i in 1..chords {
            out.push(scaled.sample(i as f64 / chords as f64));
        }
        out.push(scaled.end());
    }

    /// Flattens a single segment into its own open polyline.
    pub fn flatten_segment(&self, segment: &Segment, scale: f64) -> Polyline {
        let mut points = vec![segment.start().scaled(scale)];
        self.flatten_segment_into(segment, scale, &mut points);
        Polyline::open(points)
    }
}

/// Flattens `path` with the default chord floor.
pub fn flatten(path: &Path, scale: f64, tolerance: f64) -> Vec<Polyline> {
    Tessellator::new(tolerance).flatten(path, scale)
}

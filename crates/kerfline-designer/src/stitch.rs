//! Reconnects unordered fragments into maximal polylines.
//!
//! Imported outlines often arrive as loose line segments with no ordering or
//! consistent direction. The stitcher keys every fragment end by a
//! reduced-precision point and greedily chains fragments that meet. Ties go
//! to the earliest fragment in input order.

use std::collections::{HashMap, VecDeque};

use kerfline_core::EngineConfig;
use smallvec::SmallVec;
use tracing::debug;

use crate::geometry::{LineSegment, Point, PointKey, Polyline};

/// Default number of decimal places used for endpoint matching.
pub const DEFAULT_PRECISION: u32 = 5;

#[derive(Debug, Clone, Copy)]
struct FragmentEnd {
    fragment: usize,
    /// True when the fragment starts at the keyed point.
    at_start: bool,
}

type EndMap = HashMap<PointKey, SmallVec<[FragmentEnd; 4]>>;

/// Greedy fragment chainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stitcher {
    pub precision: u32,
}

impl Default for Stitcher {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

impl Stitcher {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.stitch_precision)
    }

    fn key(&self, p: &Point) -> PointKey {
        PointKey::new(p, self.precision)
    }

    /// Chains `fragments` into as few polylines as the greedy walk finds.
    ///
    /// Fragments already flagged closed pass through untouched. Fragments
    /// with fewer than two points are dropped. A chain whose ends share a
    /// key comes out closed, with its last point snapped to its first.
    pub fn stitch(&self, fragments: &[Polyline]) -> Vec<Polyline> {
        let mut ends: EndMap = HashMap::new();
        let mut used = vec![false; fragments.len()];
        let mut output = Vec::new();

        for (index, fragment) in fragments.iter().enumerate() {
            if fragment.closed || fragment.len() < 2 {
                used[index] = true;
                if fragment.closed && fragment.len() >= 2 {
                    output.push((index, fragment.clone()));
                }
                continue;
            }
            for (point, at_start) in [(fragment.points[0], true), (fragment.points[fragment.len() - 1], false)] {
                ends.entry(self.key(&point)).or_default().push(FragmentEnd {
                    fragment: index,
                    at_start,
                });
            }
        }

        for index in 0..fragments.len() {
            if used[index] {
                continue;
            }
            used[index] = true;
            let mut chain: VecDeque<Point> = fragments[index].points.iter().copied().collect();

            let mut closed = self.grow_forward(&mut chain, fragments, &ends, &mut used);
            if !closed {
                closed = self.grow_backward(&mut chain, fragments, &ends, &mut used);
            }

            let mut points: Vec<Point> = chain.into();
            if closed {
                let first = points[0];
                if let Some(last) = points.last_mut() {
                    *last = first;
                }
            }
            output.push((index, Polyline::new(points, closed)));
        }

        output.sort_by_key(|(index, _)| *index);
        let polylines: Vec<Polyline> = output.into_iter().map(|(_, p)| p).collect();
        debug!(
            "Stitched {} fragments into {} polylines",
            fragments.len(),
            polylines.len()
        );
        polylines
    }

    /// Adapts bare line segments. Segments whose ends share a key are
    /// dropped as zero-length.
    pub fn stitch_lines(&self, lines: &[LineSegment]) -> Vec<Polyline> {
        let fragments: Vec<Polyline> = lines
            .iter()
            .filter(|l| self.key(&l.start) != self.key(&l.end))
            .map(|l| Polyline::open(vec![l.start, l.end]))
            .collect();
        self.stitch(&fragments)
    }

    fn is_closed(&self, chain: &VecDeque<Point>) -> bool {
        match (chain.front(), chain.back()) {
            (Some(first), Some(last)) => chain.len() > 2 && self.key(first) == self.key(last),
            _ => false,
        }
    }

    fn grow_forward(
        &self,
        chain: &mut VecDeque<Point>,
        fragments: &[Polyline],
        ends: &EndMap,
        used: &mut [bool],
    ) -> bool {
        loop {
            if self.is_closed(chain) {
                return true;
            }
            let Some(tail) = chain.back() else {
                return false;
            };
            let Some(end) = take_unused(ends, &self.key(tail), used) else {
                return false;
            };
            let points = &fragments[end.fragment].points;
            if end.at_start {
                chain.extend(points.iter().skip(1).copied());
            } else {
                chain.extend(points.iter().rev().skip(1).copied());
            }
        }
    }

    fn grow_backward(
        &self,
        chain: &mut VecDeque<Point>,
        fragments: &[Polyline],
        ends: &EndMap,
        used: &mut [bool],
    ) -> bool {
        loop {
            if self.is_closed(chain) {
                return true;
            }
            let Some(head) = chain.front() else {
                return false;
            };
            let Some(end) = take_unused(ends, &self.key(head), used) else {
                return false;
            };
            let points = &fragments[end.fragment].points;
            // Walk the fragment away from the head, pushing each point in
            // front so the chain keeps its direction.
            if end.at_start {
                for p in points.iter().skip(1) {
                    chain.push_front(*p);
                }
            } else {
                for p in points.iter().rev().skip(1) {
                    chain.push_front(*p);
                }
            }
        }
    }
}

/// Claims the first unused fragment end at `key`, in input order.
fn take_unused(ends: &EndMap, key: &PointKey, used: &mut [bool]) -> Option<FragmentEnd> {
    let end = ends
        .get(key)?
        .iter()
        .find(|end| !used[end.fragment])
        .copied()?;
    used[end.fragment] = true;
    Some(end)
}

/// Stitches with the default precision.
pub fn stitch(fragments: &[Polyline]) -> Vec<Polyline> {
    Stitcher::default().stitch(fragments)
}

/// Stitches bare line segments with the default precision.
pub fn stitch_lines(lines: &[LineSegment]) -> Vec<Polyline> {
    Stitcher::default().stitch_lines(lines)
}

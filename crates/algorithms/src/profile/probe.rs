//! Perpendicular probes
//!
//! A probe is a segment of length `2L` centred on a sample point and
//! perpendicular to the polygon's axis. It is clipped against the polygon
//! (as a closed area) and the longest connected piece is taken as the
//! cross-section at that point.
//!
//! Clipping works in the probe's own parameter space: every crossing with
//! a boundary ring splits the probe into intervals, and each interval is
//! kept when its midpoint lies inside or on the boundary. Runs of kept
//! intervals form the connected pieces. Probes running along a boundary
//! edge therefore count that edge as part of the polygon.

use crate::vector::segment_length;
use geo::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line, MultiPolygon};

/// Parameters closer than this (as a fraction of the probe length) are merged.
const PARAM_EPSILON: f64 = 1e-12;

/// Relative length difference below which two pieces count as equally long.
const LENGTH_TOLERANCE: f64 = 1e-9;

/// Result of casting one probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    /// Longest connected piece of the clipped probe, `None` when empty
    pub segment: Option<Line<f64>>,
    /// Length of `segment`, 0 when empty
    pub width: f64,
    /// Number of connected pieces the probe was clipped into
    pub pieces: usize,
}

impl Probe {
    fn empty() -> Self {
        Self {
            segment: None,
            width: 0.0,
            pieces: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segment.is_none()
    }
}

/// Build the full, unclipped probe through `center`.
///
/// The probe runs perpendicular to `angle` (radians), from
/// `center + L·n` to `center − L·n` where `n = (−sin θ, cos θ)`.
pub fn probe_line(center: Coord<f64>, angle: f64, half_length: f64) -> Line<f64> {
    let (sin, cos) = angle.sin_cos();
    let n = Coord { x: -sin, y: cos };
    Line::new(
        Coord {
            x: center.x + n.x * half_length,
            y: center.y + n.y * half_length,
        },
        Coord {
            x: center.x - n.x * half_length,
            y: center.y - n.y * half_length,
        },
    )
}

/// Clip a segment to a polygon area.
///
/// Returns the connected pieces in order from `line.start` to `line.end`.
/// Pieces that touch end to end are returned as one piece; a contact at a
/// single point produces no piece.
pub fn clip_line(line: Line<f64>, boundary: &MultiPolygon<f64>) -> Vec<Line<f64>> {
    let delta = line.delta();
    let len_sq = delta.x * delta.x + delta.y * delta.y;
    if !(len_sq > 0.0) {
        return Vec::new();
    }

    let param = |c: Coord<f64>| -> f64 {
        (((c.x - line.start.x) * delta.x + (c.y - line.start.y) * delta.y) / len_sq).clamp(0.0, 1.0)
    };
    let at = |t: f64| Coord {
        x: line.start.x + delta.x * t,
        y: line.start.y + delta.y * t,
    };

    let mut params = vec![0.0, 1.0];
    for polygon in &boundary.0 {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            for edge in ring.lines().filter(|e| e.start != e.end) {
                match line_intersection(line, edge) {
                    Some(LineIntersection::SinglePoint { intersection, .. }) => {
                        params.push(param(intersection));
                    }
                    Some(LineIntersection::Collinear { intersection }) => {
                        params.push(param(intersection.start));
                        params.push(param(intersection.end));
                    }
                    None => {}
                }
            }
        }
    }

    params.sort_by(f64::total_cmp);
    params.dedup_by(|a, b| (*a - *b).abs() <= PARAM_EPSILON);

    let mut pieces = Vec::new();
    let mut open: Option<f64> = None;
    for w in params.windows(2) {
        let (t0, t1) = (w[0], w[1]);
        let inside = boundary.coordinate_position(&at(0.5 * (t0 + t1))) != CoordPos::Outside;
        match (inside, open) {
            (true, None) => open = Some(t0),
            (false, Some(start)) => {
                pieces.push(Line::new(at(start), at(t0)));
                open = None;
            }
            _ => {}
        }
    }
    if let (Some(start), Some(&end)) = (open, params.last()) {
        pieces.push(Line::new(at(start), at(end)));
    }
    pieces
}

/// Cast a probe at `center` across `boundary` and keep the longest piece.
///
/// An empty intersection gives width 0. Ties between pieces of equal
/// length go to the piece nearest the probe start.
pub fn cast_probe(
    center: Coord<f64>,
    angle: f64,
    boundary: &MultiPolygon<f64>,
    half_length: f64,
) -> Probe {
    let pieces = clip_line(probe_line(center, angle, half_length), boundary);

    let longest = pieces
        .iter()
        .map(|p| (*p, segment_length(p)))
        .fold(None, |best: Option<(Line<f64>, f64)>, (piece, len)| match best {
            Some((_, best_len)) if len <= best_len + LENGTH_TOLERANCE * best_len.max(1.0) => best,
            _ => Some((piece, len)),
        });

    match longest {
        Some((segment, width)) if width > 0.0 => Probe {
            segment: Some(segment),
            width,
            pieces: pieces.len(),
        },
        _ => Probe::empty(),
    }
}

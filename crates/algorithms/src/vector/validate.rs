//! Geometry preconditions
//!
//! A polygon or centerline that fails these checks is skipped rather than
//! measured, so that a malformed input never yields a plausible width.

use super::measurements::area;
use geo::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line, LineString, MultiPolygon, Polygon};

/// Check a polygon boundary.
///
/// Fails when a coordinate is non-finite, a ring has fewer than four
/// coordinates, the area is zero, any ring crosses or overlaps itself,
/// two rings of a part cross or overlap, or a hole has a vertex outside
/// its exterior. Rings may touch at single points.
pub fn validate_polygon(boundary: &MultiPolygon<f64>) -> Result<(), String> {
    if boundary.0.is_empty() {
        return Err("boundary has no parts".to_string());
    }

    for (part, polygon) in boundary.0.iter().enumerate() {
        let rings: Vec<&LineString<f64>> =
            std::iter::once(polygon.exterior()).chain(polygon.interiors()).collect();

        for (ring_idx, ring) in rings.iter().enumerate() {
            if !all_finite(ring) {
                return Err(format!("part {} ring {} has a non-finite coordinate", part, ring_idx));
            }
            if ring.0.len() < 4 {
                return Err(format!(
                    "part {} ring {} has {} coordinates, need at least 4",
                    part,
                    ring_idx,
                    ring.0.len()
                ));
            }
        }

        for (ring_idx, ring) in rings.iter().enumerate() {
            if let Some((i, j)) = self_intersection(ring) {
                return Err(format!(
                    "part {} ring {} self-intersects at edges {} and {}",
                    part, ring_idx, i, j
                ));
            }
        }

        for a in 0..rings.len() {
            for b in (a + 1)..rings.len() {
                if rings_cross(rings[a], rings[b]) {
                    return Err(format!("part {} rings {} and {} cross", part, a, b));
                }
            }
        }

        let shell = Polygon::new(polygon.exterior().clone(), vec![]);
        for (hole_idx, hole) in polygon.interiors().iter().enumerate() {
            if hole.0.iter().any(|c| shell.coordinate_position(c) == CoordPos::Outside) {
                return Err(format!("part {} hole {} lies outside the exterior", part, hole_idx + 1));
            }
        }
    }

    let a = area(boundary);
    if !(a > 0.0) {
        return Err(format!("boundary area is {}", a));
    }

    Ok(())
}

/// Check a centerline: every coordinate must be finite.
///
/// Zero-length and single-point lines pass; they are handled downstream
/// as an undefined orientation.
pub fn validate_centerline(line: &LineString<f64>) -> Result<(), String> {
    if all_finite(line) {
        Ok(())
    } else {
        Err("centerline has a non-finite coordinate".to_string())
    }
}

fn all_finite(ring: &LineString<f64>) -> bool {
    ring.0.iter().all(|c| c.x.is_finite() && c.y.is_finite())
}

fn bbox_overlap(a: &Line<f64>, b: &Line<f64>) -> bool {
    let (amin, amax) = bounds(a);
    let (bmin, bmax) = bounds(b);
    amin.x <= bmax.x && bmin.x <= amax.x && amin.y <= bmax.y && bmin.y <= amax.y
}

fn bounds(l: &Line<f64>) -> (Coord<f64>, Coord<f64>) {
    (
        Coord { x: l.start.x.min(l.end.x), y: l.start.y.min(l.end.y) },
        Coord { x: l.start.x.max(l.end.x), y: l.start.y.max(l.end.y) },
    )
}

/// Find the first pair of ring edges that cross or overlap.
///
/// Adjacent edges may share their common vertex but must not fold back
/// onto each other. Zero-length edges are ignored.
fn self_intersection(ring: &LineString<f64>) -> Option<(usize, usize)> {
    let edges: Vec<(usize, Line<f64>)> = ring
        .lines()
        .enumerate()
        .filter(|(_, l)| l.start != l.end)
        .collect();
    let n = edges.len();

    for a in 0..n {
        for b in (a + 1)..n {
            let (i, ei) = edges[a];
            let (j, ej) = edges[b];
            if !bbox_overlap(&ei, &ej) {
                continue;
            }
            let adjacent = b == a + 1 || (a == 0 && b == n - 1);
            match line_intersection(ei, ej) {
                Some(LineIntersection::SinglePoint { is_proper, .. }) => {
                    if is_proper && !adjacent {
                        return Some((i, j));
                    }
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    if intersection.start != intersection.end || !adjacent {
                        return Some((i, j));
                    }
                }
                None => {}
            }
        }
    }
    None
}

/// Whether two distinct rings cross properly or share a stretch of edge.
fn rings_cross(a: &LineString<f64>, b: &LineString<f64>) -> bool {
    let edges_b: Vec<Line<f64>> = b.lines().filter(|l| l.start != l.end).collect();
    a.lines().filter(|l| l.start != l.end).any(|ea| {
        edges_b.iter().any(|eb| {
            bbox_overlap(&ea, eb)
                && match line_intersection(ea, *eb) {
                    Some(LineIntersection::SinglePoint { is_proper, .. }) => is_proper,
                    Some(LineIntersection::Collinear { intersection }) => {
                        intersection.start != intersection.end
                    }
                    None => false,
                }
        })
    })
}

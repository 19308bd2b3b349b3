//! Axial orientation of a centerline
//!
//! Segment directions are unsigned: a segment pointing north describes the
//! same axis as one pointing south. Averaging raw angles (or unit vectors)
//! lets opposing segments cancel, so the mean is taken on doubled angles
//! and halved afterwards:
//!
//! ```text
//! S = Σ w·sin(2a)   C = Σ w·cos(2a)   W = Σ w
//! θ = ½·atan2(S, C)  ∈ [0, π)
//! ```
//!
//! with `a = atan2(dy, dx)` and `w` the segment length.

use geo::{Intersects, Line, LineString, MultiPolygon};
use std::f64::consts::PI;

/// Length-weighted axial mean of a set of segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxialMean {
    /// Mean axis in radians, in `[0, π)`
    pub angle: f64,
    /// Total segment length `W`
    pub weight: f64,
    /// Mean resultant length `√(S² + C²) / W` in `[0, 1]`;
    /// 1 for a straight line, near 0 when no axis dominates
    pub resultant_length: f64,
}

/// Running sums for the doubled-angle mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxialAccumulator {
    sin_sum: f64,
    cos_sum: f64,
    weight: f64,
}

impl AxialAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one segment, weighted by its length.
    pub fn push(&mut self, segment: &Line<f64>) {
        let (dx, dy) = (segment.dx(), segment.dy());
        let w = dx.hypot(dy);
        if w == 0.0 {
            return;
        }
        let a2 = 2.0 * dy.atan2(dx);
        self.sin_sum += w * a2.sin();
        self.cos_sum += w * a2.cos();
        self.weight += w;
    }

    /// Total weight accumulated so far.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The mean axis, or `None` when no weight has been accumulated.
    pub fn mean(&self) -> Option<AxialMean> {
        if !(self.weight > 0.0) {
            return None;
        }
        let angle = normalize_axial(0.5 * self.sin_sum.atan2(self.cos_sum));
        let resultant_length = (self.sin_sum.hypot(self.cos_sum) / self.weight).min(1.0);
        Some(AxialMean {
            angle,
            weight: self.weight,
            resultant_length,
        })
    }
}

impl Extend<Line<f64>> for AxialAccumulator {
    fn extend<I: IntoIterator<Item = Line<f64>>>(&mut self, iter: I) {
        for segment in iter {
            self.push(&segment);
        }
    }
}

/// Map any angle onto the axial range `[0, π)`.
pub fn normalize_axial(angle: f64) -> f64 {
    let a = angle.rem_euclid(PI);
    // rem_euclid can round up to exactly π for tiny negative inputs
    if a >= PI || a == 0.0 {
        0.0
    } else {
        a
    }
}

/// Smallest difference between two axial angles, in `[0, π/2]`.
pub fn axial_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(PI);
    d.min(PI - d)
}

/// Axial mean over every segment of a centerline.
pub fn axial_mean(line: &LineString<f64>) -> Option<AxialMean> {
    let mut acc = AxialAccumulator::new();
    acc.extend(line.lines());
    acc.mean()
}

/// Axial mean over the centerline segments that touch `boundary`.
///
/// Skeleton branches can run past the polygon they were extracted from;
/// only the segments intersecting the polygon describe its axis.
pub fn axial_mean_within(line: &LineString<f64>, boundary: &MultiPolygon<f64>) -> Option<AxialMean> {
    let mut acc = AxialAccumulator::new();
    acc.extend(line.lines().filter(|seg| boundary.intersects(seg)));
    acc.mean()
}

/// Orientation angle of a centerline in `[0, π)`, or `None` when the
/// centerline has zero total length.
pub fn axial_orientation(line: &LineString<f64>) -> Option<f64> {
    axial_mean(line).map(|m| m.angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Polygon;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn ls(coords: &[(f64, f64)]) -> LineString<f64> {
        LineString::from(coords.to_vec())
    }

    #[test]
    fn test_horizontal_line() {
        let a = axial_orientation(&ls(&[(0.0, 5.0), (100.0, 5.0)])).unwrap();
        assert_eq!(a, 0.0);
    }

    #[test]
    fn test_vertical_line_both_directions() {
        let up = axial_orientation(&ls(&[(0.0, 0.0), (0.0, 10.0)])).unwrap();
        let down = axial_orientation(&ls(&[(0.0, 10.0), (0.0, 0.0)])).unwrap();
        assert!((up - FRAC_PI_2).abs() < 1e-12);
        assert!((down - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_opposing_segments_do_not_cancel() {
        // Out and back along the same axis: a vector mean would be zero
        let a = axial_orientation(&ls(&[(0.0, 0.0), (10.0, 10.0), (0.0, 0.0)])).unwrap();
        assert!((a - PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_wraparound_near_zero() {
        // Axes at +5° and 175° straddle the wrap point; the mean is 0, not 90°
        let d = 5f64.to_radians();
        let line = ls(&[(0.0, 0.0), (d.cos(), d.sin()), (0.0, 2.0 * d.sin())]);
        let a = axial_orientation(&line).unwrap();
        assert!(axial_difference(a, 0.0) < 1e-9, "got {}", a);
    }

    #[test]
    fn test_long_segments_dominate() {
        let line = ls(&[(0.0, 0.0), (100.0, 0.0), (100.0, 1.0)]);
        let a = axial_orientation(&line).unwrap();
        assert!(axial_difference(a, 0.0) < 0.02, "got {}", a);
    }

    #[test]
    fn test_zero_length_is_undefined() {
        assert!(axial_orientation(&ls(&[])).is_none());
        assert!(axial_orientation(&ls(&[(3.0, 3.0)])).is_none());
        assert!(axial_orientation(&ls(&[(3.0, 3.0), (3.0, 3.0)])).is_none());
    }

    #[test]
    fn test_resultant_length() {
        let straight = axial_mean(&ls(&[(0.0, 0.0), (5.0, 5.0), (9.0, 9.0)])).unwrap();
        assert!((straight.resultant_length - 1.0).abs() < 1e-12);

        // Equal lengths on orthogonal axes: no dominant axis
        let cross = axial_mean(&ls(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])).unwrap();
        assert!(cross.resultant_length < 1e-12);
        assert!((cross.weight - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_within_polygon_ignores_outside_segments() {
        let boundary = MultiPolygon::new(vec![Polygon::new(
            ls(&[(0.0, 0.0), (100.0, 0.0), (100.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
            vec![],
        )]);
        // Horizontal inside, then a long vertical excursion far away
        let line = ls(&[(0.0, 5.0), (100.0, 5.0), (200.0, 5.0), (200.0, 500.0)]);

        let all = axial_orientation(&line).unwrap();
        let within = axial_mean_within(&line, &boundary).unwrap().angle;
        assert!(axial_difference(all, 0.0) > 0.5);
        assert!(axial_difference(within, 0.0) < 1e-12);
    }

    #[test]
    fn test_within_polygon_undefined_when_disjoint() {
        let boundary = MultiPolygon::new(vec![Polygon::new(
            ls(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]),
            vec![],
        )]);
        let line = ls(&[(5.0, 5.0), (9.0, 9.0)]);
        assert!(axial_mean_within(&line, &boundary).is_none());
    }

    #[test]
    fn test_normalize_axial() {
        assert_eq!(normalize_axial(0.0), 0.0);
        assert!((normalize_axial(-FRAC_PI_2) - FRAC_PI_2).abs() < 1e-12);
        assert!((normalize_axial(PI + 0.25) - 0.25).abs() < 1e-12);
        assert_eq!(normalize_axial(PI), 0.0);
        assert_eq!(normalize_axial(-1e-20), 0.0);
    }

    fn coords_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 2..20)
    }

    proptest! {
        #[test]
        fn prop_reversal_invariant(coords in coords_strategy()) {
            let forward = ls(&coords);
            let mut rev = coords.clone();
            rev.reverse();
            let backward = ls(&rev);

            match (axial_mean(&forward), axial_mean(&backward)) {
                (Some(f), Some(b)) => {
                    // The angle is only meaningful when an axis dominates
                    if f.resultant_length > 1e-6 {
                        prop_assert!(axial_difference(f.angle, b.angle) < 1e-6);
                    }
                }
                (None, None) => {}
                _ => prop_assert!(false, "definedness changed under reversal"),
            }
        }

        #[test]
        fn prop_segment_flip_invariant(coords in coords_strategy()) {
            let line = ls(&coords);
            let mut flipped = AxialAccumulator::new();
            for seg in line.lines() {
                flipped.push(&Line::new(seg.end, seg.start));
            }
            match (axial_mean(&line), flipped.mean()) {
                (Some(f), Some(b)) => {
                    if f.resultant_length > 1e-6 {
                        prop_assert!(axial_difference(f.angle, b.angle) < 1e-6);
                    }
                }
                (None, None) => {}
                _ => prop_assert!(false, "definedness changed under flip"),
            }
        }

        #[test]
        fn prop_angle_in_range(coords in coords_strategy()) {
            if let Some(a) = axial_orientation(&ls(&coords)) {
                prop_assert!((0.0..PI).contains(&a));
            }
        }
    }
}

//! Evenly spaced sample points along a centerline
//!
//! Samples sit at arc-length distances `0, d, 2d, …` for every `k·d` that
//! does not exceed the total length (within a small tolerance). The last
//! partial step is not sampled, so the final sample lies at most `d`
//! before the end of the line. A zero-length line with at least one
//! coordinate yields a single sample at distance 0; an empty line yields
//! none.

use crate::vector::segment_length;
use geo::{Coord, LineString};
use std::iter::FusedIterator;
use swath_core::{Error, PolygonId, Result, SamplePoint};

/// A validated sampling interval (finite and strictly positive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingInterval(f64);

impl SamplingInterval {
    pub fn new(interval: f64) -> Result<Self> {
        if interval.is_finite() && interval > 0.0 {
            Ok(Self(interval))
        } else {
            Err(Error::invalid_parameter(
                "sample_interval",
                interval,
                "must be finite and greater than zero",
            ))
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

/// Restartable sampler over one centerline.
///
/// Each call to [`Sampler::iter`] starts again from distance 0.
#[derive(Debug, Clone, Copy)]
pub struct Sampler<'a> {
    polygon_id: PolygonId,
    line: &'a LineString<f64>,
    total: f64,
    interval: f64,
}

impl<'a> Sampler<'a> {
    pub fn new(polygon_id: PolygonId, line: &'a LineString<f64>, interval: SamplingInterval) -> Self {
        let total = line.lines().map(|l| segment_length(&l)).sum();
        Self {
            polygon_id,
            line,
            total,
            interval: interval.get(),
        }
    }

    /// Total arc length of the centerline.
    pub fn total_length(&self) -> f64 {
        self.total
    }

    fn tolerance(&self) -> f64 {
        1e-9 * self.total.max(1.0)
    }

    /// Number of samples [`Sampler::iter`] yields.
    pub fn sample_count(&self) -> usize {
        if self.line.0.is_empty() {
            return 0;
        }
        let limit = self.total + self.tolerance();
        let mut n = (limit / self.interval).floor() as usize + 1;
        while n > 1 && (n - 1) as f64 * self.interval > limit {
            n -= 1;
        }
        while n as f64 * self.interval <= limit {
            n += 1;
        }
        n
    }

    pub fn iter(&self) -> SampleIter<'a> {
        SampleIter {
            polygon_id: self.polygon_id,
            coords: &self.line.0,
            total: self.total,
            interval: self.interval,
            tolerance: self.tolerance(),
            k: 0,
            segment: 0,
            segment_start: 0.0,
            done: self.line.0.is_empty(),
        }
    }
}

impl<'a> IntoIterator for &Sampler<'a> {
    type Item = SamplePoint;
    type IntoIter = SampleIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator produced by [`Sampler::iter`].
#[derive(Debug, Clone)]
pub struct SampleIter<'a> {
    polygon_id: PolygonId,
    coords: &'a [Coord<f64>],
    total: f64,
    interval: f64,
    tolerance: f64,
    k: usize,
    /// Index of the segment holding the previous sample
    segment: usize,
    /// Arc length at the start of `segment`
    segment_start: f64,
    done: bool,
}

impl SampleIter<'_> {
    /// Walk forward to the segment containing `target` and interpolate.
    fn locate(&mut self, target: f64) -> Coord<f64> {
        let segments = self.coords.len().saturating_sub(1);
        if segments == 0 {
            return self.coords[0];
        }
        loop {
            let a = self.coords[self.segment];
            let b = self.coords[self.segment + 1];
            let len = (b.x - a.x).hypot(b.y - a.y);
            let last = self.segment + 1 == segments;
            if target <= self.segment_start + len || last {
                let t = if len > 0.0 {
                    ((target - self.segment_start) / len).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                return Coord {
                    x: a.x + (b.x - a.x) * t,
                    y: a.y + (b.y - a.y) * t,
                };
            }
            self.segment_start += len;
            self.segment += 1;
        }
    }
}

impl Iterator for SampleIter<'_> {
    type Item = SamplePoint;

    fn next(&mut self) -> Option<SamplePoint> {
        if self.done {
            return None;
        }
        // k·d rather than a running sum, so error does not accumulate
        let target = self.k as f64 * self.interval;
        if target > self.total + self.tolerance {
            self.done = true;
            return None;
        }
        let distance = target.min(self.total);
        let position = self.locate(distance);
        self.k += 1;
        Some(SamplePoint {
            polygon_id: self.polygon_id,
            position,
            distance,
        })
    }
}

impl FusedIterator for SampleIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(d: f64) -> SamplingInterval {
        SamplingInterval::new(d).unwrap()
    }

    fn ls(coords: &[(f64, f64)]) -> LineString<f64> {
        LineString::from(coords.to_vec())
    }

    #[test]
    fn test_interval_validation() {
        assert!(SamplingInterval::new(0.5).is_ok());
        assert!(SamplingInterval::new(0.0).is_err());
        assert!(SamplingInterval::new(-1.0).is_err());
        assert!(SamplingInterval::new(f64::NAN).is_err());
        assert!(SamplingInterval::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_exact_multiple_includes_end() {
        let line = ls(&[(0.0, 5.0), (100.0, 5.0)]);
        let sampler = Sampler::new(1, &line, interval(10.0));
        let samples: Vec<_> = sampler.iter().collect();

        assert_eq!(samples.len(), 11);
        assert_eq!(sampler.sample_count(), 11);
        for (k, s) in samples.iter().enumerate() {
            assert_eq!(s.polygon_id, 1);
            assert!((s.distance - 10.0 * k as f64).abs() < 1e-12);
            assert!((s.position.x - 10.0 * k as f64).abs() < 1e-12);
            assert_eq!(s.position.y, 5.0);
        }
    }

    #[test]
    fn test_partial_final_step_excluded() {
        let line = ls(&[(0.0, 0.0), (25.0, 0.0)]);
        let sampler = Sampler::new(1, &line, interval(10.0));
        let distances: Vec<f64> = sampler.iter().map(|s| s.distance).collect();
        assert_eq!(distances, vec![0.0, 10.0, 20.0]);
        assert_eq!(sampler.sample_count(), 3);
    }

    #[test]
    fn test_accumulated_rounding_does_not_drop_end() {
        // Ten steps of 0.1 do not sum exactly to 1; the end sample must survive
        let line = ls(&[(0.0, 0.0), (1.0, 0.0)]);
        let sampler = Sampler::new(1, &line, interval(0.1));
        let samples: Vec<_> = sampler.iter().collect();
        assert_eq!(samples.len(), 11);
        let last = samples.last().unwrap();
        assert!(last.distance <= sampler.total_length());
        assert!((last.position.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_crosses_vertices() {
        // L-shaped line: 10 east, then 10 north
        let line = ls(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let samples: Vec<_> = Sampler::new(2, &line, interval(4.0)).iter().collect();
        let positions: Vec<(f64, f64)> = samples
            .iter()
            .map(|s| (s.position.x, s.position.y))
            .collect();
        let expected = [(0.0, 0.0), (4.0, 0.0), (8.0, 0.0), (10.0, 2.0), (10.0, 6.0), (10.0, 10.0)];
        assert_eq!(positions.len(), expected.len());
        for (p, e) in positions.iter().zip(expected.iter()) {
            assert!((p.0 - e.0).abs() < 1e-12 && (p.1 - e.1).abs() < 1e-12, "{:?} vs {:?}", p, e);
        }
    }

    #[test]
    fn test_repeated_vertices_skipped() {
        let line = ls(&[(0.0, 0.0), (5.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        let xs: Vec<f64> = Sampler::new(1, &line, interval(2.5))
            .iter()
            .map(|s| s.position.x)
            .collect();
        assert_eq!(xs, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_distances_monotonic() {
        let line = ls(&[(0.0, 0.0), (3.0, 4.0), (3.0, 9.0), (-2.0, 9.0)]);
        let d: Vec<f64> = Sampler::new(1, &line, interval(0.7))
            .iter()
            .map(|s| s.distance)
            .collect();
        assert!(d.windows(2).all(|w| w[1] > w[0]));
        assert!(*d.last().unwrap() <= 15.0);
    }

    #[test]
    fn test_degenerate_lines() {
        let point = ls(&[(3.0, 4.0)]);
        let samples: Vec<_> = Sampler::new(1, &point, interval(1.0)).iter().collect();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].distance, 0.0);
        assert_eq!(samples[0].position, Coord { x: 3.0, y: 4.0 });

        let stacked = ls(&[(3.0, 4.0), (3.0, 4.0)]);
        assert_eq!(Sampler::new(1, &stacked, interval(1.0)).iter().count(), 1);

        let empty = ls(&[]);
        let sampler = Sampler::new(1, &empty, interval(1.0));
        assert_eq!(sampler.iter().count(), 0);
        assert_eq!(sampler.sample_count(), 0);
    }

    #[test]
    fn test_restartable() {
        let line = ls(&[(0.0, 0.0), (7.0, 0.0)]);
        let sampler = Sampler::new(1, &line, interval(2.0));
        let first: Vec<_> = sampler.iter().collect();
        let second: Vec<_> = (&sampler).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_interval_longer_than_line() {
        let line = ls(&[(0.0, 0.0), (1.0, 0.0)]);
        let samples: Vec<_> = Sampler::new(1, &line, interval(5.0)).iter().collect();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].distance, 0.0);
    }
}

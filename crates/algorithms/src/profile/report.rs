//! Per-polygon failures and the batch report
//!
//! A polygon that cannot be profiled is skipped with a [`PolygonError`];
//! the batch always runs to completion.

use std::collections::BTreeMap;
use std::fmt;
use swath_core::PolygonId;
use thiserror::Error;

/// Why a single polygon produced no width records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolygonError {
    #[error("polygon {id}: no centerline branch")]
    MissingCenterline { id: PolygonId },

    #[error("polygon {id}: no weighted centerline segment, orientation undefined")]
    UndefinedOrientation { id: PolygonId },

    #[error("polygon {id}: invalid geometry ({reason})")]
    InvalidGeometry { id: PolygonId, reason: String },

    #[error("polygon {id}: duplicate id, only the first occurrence is profiled")]
    DuplicateId { id: PolygonId },
}

impl PolygonError {
    pub fn polygon_id(&self) -> PolygonId {
        match self {
            PolygonError::MissingCenterline { id }
            | PolygonError::UndefinedOrientation { id }
            | PolygonError::InvalidGeometry { id, .. }
            | PolygonError::DuplicateId { id } => *id,
        }
    }

    pub fn reason(&self) -> SkipReason {
        match self {
            PolygonError::MissingCenterline { .. } => SkipReason::MissingCenterline,
            PolygonError::UndefinedOrientation { .. } => SkipReason::UndefinedOrientation,
            PolygonError::InvalidGeometry { .. } => SkipReason::InvalidGeometry,
            PolygonError::DuplicateId { .. } => SkipReason::DuplicateId,
        }
    }
}

/// Skip reason without the polygon details, for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    MissingCenterline,
    UndefinedOrientation,
    InvalidGeometry,
    DuplicateId,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::MissingCenterline => "missing centerline",
            SkipReason::UndefinedOrientation => "undefined orientation",
            SkipReason::InvalidGeometry => "invalid geometry",
            SkipReason::DuplicateId => "duplicate id",
        };
        f.write_str(s)
    }
}

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Polygons in the input
    pub polygons: usize,
    /// Polygons that produced a profile
    pub profiled: usize,
    /// Skipped polygons in input order
    pub skipped: Vec<PolygonError>,
    /// Branches whose polygon id matches no input polygon
    pub orphan_branches: usize,
    /// Samples whose probe did not intersect the polygon (width 0)
    pub degenerate_probes: usize,
    /// Samples dropped because they fell outside their polygon
    pub outside_samples: usize,
}

impl BatchReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Number of skipped polygons per reason.
    pub fn reason_counts(&self) -> BTreeMap<SkipReason, usize> {
        let mut counts = BTreeMap::new();
        for e in &self.skipped {
            *counts.entry(e.reason()).or_insert(0) += 1;
        }
        counts
    }

    /// One-line summary, e.g. `"12 of 14 polygons profiled; skipped: 2 missing centerline"`.
    pub fn summary(&self) -> String {
        let mut s = format!("{} of {} polygons profiled", self.profiled, self.polygons);
        let counts = self.reason_counts();
        if !counts.is_empty() {
            let parts: Vec<String> = counts.iter().map(|(r, n)| format!("{} {}", n, r)).collect();
            s.push_str("; skipped: ");
            s.push_str(&parts.join(", "));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_counts() {
        let report = BatchReport {
            polygons: 5,
            profiled: 2,
            skipped: vec![
                PolygonError::MissingCenterline { id: 3 },
                PolygonError::InvalidGeometry { id: 4, reason: "bowtie".into() },
                PolygonError::MissingCenterline { id: 9 },
            ],
            ..Default::default()
        };

        assert_eq!(report.skipped_count(), 3);
        let counts = report.reason_counts();
        assert_eq!(counts[&SkipReason::MissingCenterline], 2);
        assert_eq!(counts[&SkipReason::InvalidGeometry], 1);
        assert!(!counts.contains_key(&SkipReason::DuplicateId));
        assert_eq!(
            report.summary(),
            "2 of 5 polygons profiled; skipped: 2 missing centerline, 1 invalid geometry"
        );
    }

    #[test]
    fn test_error_attributes_polygon() {
        let e = PolygonError::UndefinedOrientation { id: 17 };
        assert_eq!(e.polygon_id(), 17);
        assert_eq!(e.reason(), SkipReason::UndefinedOrientation);
        assert_eq!(
            e.to_string(),
            "polygon 17: no weighted centerline segment, orientation undefined"
        );
    }

    #[test]
    fn test_clean_summary() {
        let report = BatchReport { polygons: 1, profiled: 1, ..Default::default() };
        assert_eq!(report.summary(), "1 of 1 polygons profiled");
    }
}

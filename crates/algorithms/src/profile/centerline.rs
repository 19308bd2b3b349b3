//! Centerline selection
//!
//! A skeleton usually has several branches per polygon. The longest branch
//! by arc length is kept as the polygon's centerline; on equal lengths the
//! branch seen first wins, so results follow input order.

use crate::vector::length;
use geo::LineString;
use std::collections::HashMap;
use swath_core::io::CenterlineFeature;
use swath_core::{CenterlineBranch, PolygonId};

/// The branch selected for one polygon, with its cached length.
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline {
    pub polygon_id: PolygonId,
    pub geometry: LineString<f64>,
    pub length: f64,
}

impl From<&Centerline> for CenterlineFeature {
    fn from(c: &Centerline) -> Self {
        CenterlineFeature {
            polygon_id: c.polygon_id,
            geometry: c.geometry.clone(),
            length: c.length,
        }
    }
}

/// Whether a branch of length `candidate` replaces the current best.
///
/// NaN lengths (from non-finite coordinates) never win over a real length.
fn replaces(candidate: f64, best: f64) -> bool {
    candidate > best || (best.is_nan() && !candidate.is_nan())
}

/// Group branches by polygon id and keep the longest branch of each group.
///
/// Polygons without branches are absent from the result.
pub fn select_centerlines(branches: &[CenterlineBranch]) -> HashMap<PolygonId, Centerline> {
    branches
        .iter()
        .map(|b| (b, length(&b.geometry)))
        .fold(
            HashMap::<PolygonId, (&CenterlineBranch, f64)>::new(),
            |mut best, (b, len)| {
                best.entry(b.polygon_id)
                    .and_modify(|cur| {
                        if replaces(len, cur.1) {
                            *cur = (b, len);
                        }
                    })
                    .or_insert((b, len));
                best
            },
        )
        .into_iter()
        .map(|(id, (b, len))| {
            (
                id,
                Centerline {
                    polygon_id: id,
                    geometry: b.geometry.clone(),
                    length: len,
                },
            )
        })
        .collect()
}

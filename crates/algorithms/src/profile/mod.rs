//! Width profiling of elongated polygons
//!
//! For every polygon with at least one skeleton branch:
//!
//! 1. keep the longest branch as its centerline ([`centerline`])
//! 2. estimate the polygon axis from the centerline ([`orientation`])
//! 3. sample the centerline at a fixed arc-length interval ([`sampler`])
//! 4. cast a probe perpendicular to the axis at each sample and keep the
//!    longest piece inside the polygon ([`probe`])
//! 5. collect `(polygon_id, distance, width)` records ([`aggregate`])
//!
//! Polygons are independent and are processed with a [`ProcessingMode`].
//! A polygon that cannot be profiled is skipped and reported in the
//! [`BatchReport`]; it never aborts the batch.

pub mod aggregate;
pub mod centerline;
pub mod orientation;
pub mod params;
pub mod probe;
pub mod report;
pub mod sampler;

pub use aggregate::{PolygonOrientation, PolygonProfile, ProfileCollector, WidthProfile};
pub use centerline::{select_centerlines, Centerline};
pub use orientation::{
    axial_difference, axial_mean, axial_mean_within, axial_orientation, normalize_axial,
    AxialAccumulator, AxialMean,
};
pub use params::{OrientationScope, WidthProfileParams};
pub use probe::{cast_probe, clip_line, probe_line, Probe};
pub use report::{BatchReport, PolygonError, SkipReason};
pub use sampler::{SampleIter, Sampler, SamplingInterval};

use crate::vector::{validate_centerline, validate_polygon};
use geo::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use std::collections::HashSet;
use swath_core::{Algorithm, CenterlineBranch, Error, PolygonFeature, Result};
use swath_parallel::{ParallelStrategy, ProcessingMode};
use tracing::{debug, info};

/// Polygons and their candidate skeleton branches.
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub polygons: Vec<PolygonFeature>,
    pub branches: Vec<CenterlineBranch>,
}

/// Width profiling algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct WidthProfiler {
    pub mode: ProcessingMode,
}

impl WidthProfiler {
    pub fn new(mode: ProcessingMode) -> Self {
        Self { mode }
    }
}

impl Algorithm for WidthProfiler {
    type Input = ProfileInput;
    type Output = WidthProfile;
    type Params = WidthProfileParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "WidthProfile"
    }

    fn description(&self) -> &'static str {
        "Measure polygon width perpendicular to the centerline axis at regular intervals"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        width_profile_with_mode(&input.polygons, &input.branches, &params, self.mode)
    }
}

/// Profile a batch of polygons using all available cores.
pub fn width_profile(
    polygons: &[PolygonFeature],
    branches: &[CenterlineBranch],
    params: &WidthProfileParams,
) -> Result<WidthProfile> {
    width_profile_with_mode(polygons, branches, params, ProcessingMode::Parallel)
}

/// Profile a batch of polygons.
///
/// Fails only on invalid parameters. Output follows polygon input order
/// whatever the processing mode.
pub fn width_profile_with_mode(
    polygons: &[PolygonFeature],
    branches: &[CenterlineBranch],
    params: &WidthProfileParams,
    mode: ProcessingMode,
) -> Result<WidthProfile> {
    params.validate()?;

    let centerlines = select_centerlines(branches);

    let mut seen = HashSet::with_capacity(polygons.len());
    let first_occurrence: Vec<bool> = polygons.iter().map(|p| seen.insert(p.id)).collect();

    let orphan_branches = branches
        .iter()
        .filter(|b| !seen.contains(&b.polygon_id))
        .count();
    if orphan_branches > 0 {
        debug!("{} skeleton branches have no matching polygon", orphan_branches);
    }

    let outcomes = mode.par_map(0..polygons.len(), |i| {
        let polygon = &polygons[i];
        if !first_occurrence[i] {
            return Err(PolygonError::DuplicateId { id: polygon.id });
        }
        profile_polygon(polygon, centerlines.get(&polygon.id), params)
    });

    let mut samples = ProfileCollector::new(params.retain_probes);
    let mut orientations = Vec::new();
    let mut report = BatchReport {
        polygons: polygons.len(),
        orphan_branches,
        ..Default::default()
    };

    for outcome in outcomes {
        match outcome {
            Ok(profile) => {
                report.profiled += 1;
                report.outside_samples += profile.outside_samples;
                orientations.push(profile.orientation);
                samples.append(profile.samples);
            }
            Err(e) => {
                info!("skipping {}", e);
                report.skipped.push(e);
            }
        }
    }
    report.degenerate_probes = samples.degenerate_probes();

    info!(
        "{}; {} width records, {} zero-width",
        report.summary(),
        samples.len(),
        report.degenerate_probes
    );

    let (records, probes) = samples.finish();
    Ok(WidthProfile {
        records,
        probes,
        orientations,
        report,
    })
}

/// Validate a polygon and its centerline, then estimate the polygon axis.
///
/// This is the part of [`profile_polygon`] that runs before any sampling;
/// it is also used on its own to report orientations.
pub fn polygon_orientation(
    polygon: &PolygonFeature,
    centerline: &Centerline,
    scope: OrientationScope,
) -> std::result::Result<PolygonOrientation, PolygonError> {
    let id = polygon.id;

    validate_polygon(&polygon.boundary)
        .and_then(|_| validate_centerline(&centerline.geometry))
        .map_err(|reason| PolygonError::InvalidGeometry { id, reason })?;

    let mean = match scope {
        OrientationScope::Centerline => axial_mean(&centerline.geometry),
        OrientationScope::WithinPolygon => axial_mean_within(&centerline.geometry, &polygon.boundary),
    }
    .ok_or(PolygonError::UndefinedOrientation { id })?;

    Ok(PolygonOrientation {
        polygon_id: id,
        angle: mean.angle,
        resultant_length: mean.resultant_length,
        centerline_length: centerline.length,
    })
}

/// Profile one polygon along its selected centerline.
///
/// `params` are assumed to be valid; an invalid sampling interval yields
/// no samples.
pub fn profile_polygon(
    polygon: &PolygonFeature,
    centerline: Option<&Centerline>,
    params: &WidthProfileParams,
) -> std::result::Result<PolygonProfile, PolygonError> {
    let id = polygon.id;
    let centerline = centerline.ok_or(PolygonError::MissingCenterline { id })?;
    let orientation = polygon_orientation(polygon, centerline, params.orientation_scope)?;

    let sampler = params
        .interval()
        .ok()
        .map(|interval| Sampler::new(id, &centerline.geometry, interval));
    let mut samples = ProfileCollector::with_capacity(
        params.retain_probes,
        sampler.as_ref().map_or(0, |s| s.sample_count()),
    );
    let mut outside_samples = 0;

    if let Some(sampler) = &sampler {
        for sample in sampler {
            if params.require_containment
                && polygon.boundary.coordinate_position(&sample.position) == CoordPos::Outside
            {
                outside_samples += 1;
                continue;
            }
            let probe = cast_probe(
                sample.position,
                orientation.angle,
                &polygon.boundary,
                params.probe_half_length,
            );
            samples.push(&sample, &probe);
        }
    }

    debug!(
        "polygon {}: axis {:.2}°, centerline {:.3}, {} samples, {} outside",
        id,
        orientation.angle.to_degrees(),
        centerline.length,
        samples.len(),
        outside_samples
    );

    Ok(PolygonProfile {
        orientation,
        samples,
        outside_samples,
    })
}

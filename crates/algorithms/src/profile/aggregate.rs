//! Collecting width records and probe geometry
//!
//! Each polygon fills its own [`ProfileCollector`]; the batch driver then
//! appends the collectors in polygon input order. There is no state shared
//! between polygons while they are being probed.

use super::probe::Probe;
use super::report::BatchReport;
use std::io::Write;
use swath_core::io::TableRow;
use swath_core::{PolygonId, ProbeRecord, SamplePoint, WidthRecord};

/// Width records (and optionally probes) in sampling order.
#[derive(Debug, Clone, Default)]
pub struct ProfileCollector {
    records: Vec<WidthRecord>,
    probes: Vec<ProbeRecord>,
    retain_probes: bool,
    degenerate: usize,
}

impl ProfileCollector {
    pub fn new(retain_probes: bool) -> Self {
        Self {
            retain_probes,
            ..Default::default()
        }
    }

    /// Collector sized for `samples` pushes.
    pub fn with_capacity(retain_probes: bool, samples: usize) -> Self {
        Self {
            records: Vec::with_capacity(samples),
            probes: Vec::with_capacity(if retain_probes { samples } else { 0 }),
            retain_probes,
            degenerate: 0,
        }
    }

    /// Record the width measured at `sample`.
    pub fn push(&mut self, sample: &SamplePoint, probe: &Probe) {
        let measured = ProbeRecord {
            polygon_id: sample.polygon_id,
            distance: sample.distance,
            width: probe.width,
            segment: probe.segment,
        };
        if probe.is_empty() {
            self.degenerate += 1;
        }
        self.records.push(measured.record());
        if self.retain_probes {
            self.probes.push(measured);
        }
    }

    /// Move everything from `other` to the end of this collector.
    pub fn append(&mut self, mut other: ProfileCollector) {
        self.records.append(&mut other.records);
        self.probes.append(&mut other.probes);
        self.degenerate += other.degenerate;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Samples whose probe missed the polygon.
    pub fn degenerate_probes(&self) -> usize {
        self.degenerate
    }

    pub fn finish(self) -> (Vec<WidthRecord>, Vec<ProbeRecord>) {
        (self.records, self.probes)
    }
}

/// Orientation estimate of one profiled polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonOrientation {
    pub polygon_id: PolygonId,
    /// Axis angle in radians, `[0, π)`, counter-clockwise from +x
    pub angle: f64,
    /// Mean resultant length of the doubled angles, `[0, 1]`
    pub resultant_length: f64,
    /// Length of the selected centerline
    pub centerline_length: f64,
}

impl TableRow for PolygonOrientation {
    fn header() -> &'static str {
        "polygon_id,angle_rad,angle_deg,resultant_length,centerline_length"
    }

    fn write_row<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(
            out,
            "{},{},{},{},{}",
            self.polygon_id,
            self.angle,
            self.angle.to_degrees(),
            self.resultant_length,
            self.centerline_length
        )
    }
}

/// Everything one profiled polygon contributes to the batch.
#[derive(Debug, Clone)]
pub struct PolygonProfile {
    pub orientation: PolygonOrientation,
    pub samples: ProfileCollector,
    /// Samples dropped by the containment filter
    pub outside_samples: usize,
}

/// Output of a batch run.
#[derive(Debug, Clone, Default)]
pub struct WidthProfile {
    /// Width records, polygons in input order, samples in sampling order
    pub records: Vec<WidthRecord>,
    /// Clipped probes matching `records` one to one; empty unless retained
    pub probes: Vec<ProbeRecord>,
    /// One entry per profiled polygon, in input order
    pub orientations: Vec<PolygonOrientation>,
    pub report: BatchReport,
}

impl WidthProfile {
    /// Width records of a single polygon.
    pub fn records_for(&self, id: PolygonId) -> impl Iterator<Item = &WidthRecord> + '_ {
        self.records.iter().filter(move |r| r.polygon_id == id)
    }

    pub fn orientation_of(&self, id: PolygonId) -> Option<&PolygonOrientation> {
        self.orientations.iter().find(|o| o.polygon_id == id)
    }
}

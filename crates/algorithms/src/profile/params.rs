//! Parameters for width profiling

use super::sampler::SamplingInterval;
use serde::{Deserialize, Serialize};
use swath_core::{Error, Result};

/// Which centerline segments feed the orientation estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationScope {
    /// Every segment of the selected centerline
    #[default]
    Centerline,
    /// Only segments that intersect the polygon
    WithinPolygon,
}

/// Parameters for width profiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidthProfileParams {
    /// Arc-length spacing between samples (default 0.5)
    pub sample_interval: f64,
    /// Half-length of each probe (default 1000.0).
    /// Must exceed the largest half-width of any polygon in the batch.
    pub probe_half_length: f64,
    /// Segments used for the orientation estimate
    pub orientation_scope: OrientationScope,
    /// Drop samples that lie outside their polygon instead of recording width 0
    pub require_containment: bool,
    /// Keep the clipped probe geometry alongside each width record
    pub retain_probes: bool,
}

impl Default for WidthProfileParams {
    fn default() -> Self {
        Self {
            sample_interval: 0.5,
            probe_half_length: 1000.0,
            orientation_scope: OrientationScope::Centerline,
            require_containment: false,
            retain_probes: true,
        }
    }
}

impl WidthProfileParams {
    /// Reject non-finite or non-positive lengths.
    pub fn validate(&self) -> Result<()> {
        SamplingInterval::new(self.sample_interval)?;
        if !(self.probe_half_length.is_finite() && self.probe_half_length > 0.0) {
            return Err(Error::invalid_parameter(
                "probe_half_length",
                self.probe_half_length,
                "must be finite and greater than zero",
            ));
        }
        Ok(())
    }

    pub(crate) fn interval(&self) -> Result<SamplingInterval> {
        SamplingInterval::new(self.sample_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let p = WidthProfileParams::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.sample_interval, 0.5);
        assert_eq!(p.probe_half_length, 1000.0);
        assert_eq!(p.orientation_scope, OrientationScope::Centerline);
        assert!(!p.require_containment);
        assert!(p.retain_probes);
    }

    #[test]
    fn test_rejects_bad_lengths() {
        let p = WidthProfileParams { sample_interval: 0.0, ..Default::default() };
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "sample_interval", .. })
        ));

        let p = WidthProfileParams { probe_half_length: f64::NAN, ..Default::default() };
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter { name: "probe_half_length", .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let p: WidthProfileParams =
            serde_json::from_str(r#"{"sample_interval": 2.0, "orientation_scope": "within_polygon"}"#)
                .unwrap();
        assert_eq!(p.sample_interval, 2.0);
        assert_eq!(p.probe_half_length, 1000.0);
        assert_eq!(p.orientation_scope, OrientationScope::WithinPolygon);
    }
}

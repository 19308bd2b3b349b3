//! # Swath Algorithms
//!
//! Width profiling of elongated polygons along their skeleton.
//!
//! ## Modules
//!
//! - **profile**: centerline selection, axial orientation, sampling,
//!   perpendicular probes and the batch driver
//! - **statistics**: per-polygon summaries of a width profile
//! - **vector**: measurements and geometry validation

pub mod profile;
pub mod statistics;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::profile::{
        axial_orientation, cast_probe, select_centerlines, width_profile,
        width_profile_with_mode, BatchReport, Centerline, OrientationScope, PolygonError,
        PolygonOrientation, Probe, ProfileInput, Sampler, SamplingInterval, WidthProfile,
        WidthProfileParams, WidthProfiler,
    };
    pub use crate::statistics::{profile_statistics, ProfileStats};
    pub use swath_core::prelude::*;
    pub use swath_parallel::ProcessingMode;
}

//! Vector measurements and validation
//!
//! - Area / Length: geometric measurements used by the profiler
//! - Validation: polygon and centerline preconditions

mod measurements;
mod validate;

pub use measurements::{area, length, segment_length};
pub use validate::{validate_centerline, validate_polygon};

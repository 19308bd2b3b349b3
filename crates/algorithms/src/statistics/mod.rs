//! Statistics over width profiles
//!
//! - **profile_stats**: per-polygon summary of the width table

pub mod profile_stats;

pub use profile_stats::{profile_statistics, ProfileStats};

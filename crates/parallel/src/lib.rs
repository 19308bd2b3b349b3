//! # Swath Parallel
//!
//! Processing modes for batch work over independent items.
//!
//! Polygons are profiled independently, so the batch driver maps over
//! polygon indices with a [`ProcessingMode`]. With the `parallel` feature
//! disabled (e.g. for WASM builds) every mode runs sequentially.

pub mod strategy;

pub use strategy::{num_cpus, ParallelStrategy, ProcessingMode};

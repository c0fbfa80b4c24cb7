//! Per-security rolling statistics for the stdev pipeline.
//!
//! This crate handles:
//! - Incremental rolling sample standard deviation
//! - Exact-cadence contiguity tracking
//! - The per-group engine combining both, with group-level parallelism

pub mod contiguity;
pub mod engine;
pub mod stdev;

pub use contiguity::ContiguityTracker;
pub use engine::RollingEngine;
pub use stdev::RollingStdev;

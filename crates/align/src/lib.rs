//! Temporal alignment and price conversion for the rates pipeline.
//!
//! This crate handles:
//! - Backward as-of alignment of prices to spot rates (tolerance-bounded)
//! - Left-joining conversion rules onto aligned rows
//! - Per-row conditional price conversion

pub mod asof;
pub mod convert;
pub mod rules;

pub use asof::TemporalAligner;
pub use convert::{convert_records, convert_row};
pub use rules::RuleMerger;

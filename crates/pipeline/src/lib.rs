//! Pipeline orchestration for tsflow.
//!
//! This crate provides:
//! - CSV table loader and writer collaborators
//! - The inclusive time-window filter
//! - The rates conversion pipeline (align, merge, convert, filter, write)
//! - The rolling stdev pipeline (group, compute, filter, write)

pub mod rates;
pub mod sink;
pub mod source;
pub mod stdev;
pub mod window;

pub use rates::{RatesJob, RatesPipeline};
pub use sink::CsvSink;
pub use source::CsvSource;
pub use stdev::{StdevJob, StdevPipeline};
pub use window::TimeWindow;

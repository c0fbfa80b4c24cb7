//! Rolling stdev pipeline.
//!
//! Load the snapshot table, compute per-security rolling standard
//! deviations, filter to the requested window, write the output table.

use tracing::info;
use tsflow_core::{Config, Result, RollingResult};
use tsflow_rolling::RollingEngine;

use crate::sink::CsvSink;
use crate::source::CsvSource;
use crate::window::TimeWindow;

/// File names and window for one stdev run.
#[derive(Debug, Clone)]
pub struct StdevJob {
    /// Snapshot table.
    pub input_file: String,
    /// Output file name under the sink directory.
    pub output_file: String,
    /// Inclusive output window.
    pub window: TimeWindow,
}

impl Default for StdevJob {
    fn default() -> Self {
        Self {
            input_file: "stdev_price_data.csv".to_string(),
            output_file: "rolling_stdev.csv".to_string(),
            window: TimeWindow::default(),
        }
    }
}

/// The rolling stdev pipeline.
pub struct StdevPipeline {
    engine: RollingEngine,
}

impl StdevPipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            engine: RollingEngine::new(&config.rolling),
        }
    }

    /// Run the pipeline, returning the rows that were written.
    pub fn run(
        &self,
        source: &CsvSource,
        sink: &CsvSink,
        job: &StdevJob,
    ) -> Result<Vec<RollingResult>> {
        let snapshots = source.load_snapshots(&job.input_file)?;
        info!(rows = snapshots.len(), "loaded snapshots");

        let results = self.engine.compute(&snapshots)?;
        let filtered = job.window.filter(results, |row| row.snap_time);
        info!(rows = filtered.len(), "stdev pipeline finished");

        let path = sink.write_rolling(&job.output_file, &filtered)?;
        info!(path = %path.display(), "wrote rolling stdevs");
        Ok(filtered)
    }
}

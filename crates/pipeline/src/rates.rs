//! Rates conversion pipeline.
//!
//! Load the price, spot-rate, and rule tables; as-of align spots into
//! prices; left-join the rules; convert; filter to the requested window;
//! write the flat output table.

use tracing::info;
use tsflow_align::{convert_records, RuleMerger, TemporalAligner};
use tsflow_core::{Config, ConvertedRecord, Result};

use crate::sink::CsvSink;
use crate::source::CsvSource;
use crate::window::TimeWindow;

/// File names and window for one rates run.
#[derive(Debug, Clone)]
pub struct RatesJob {
    /// Currency conversion rule table.
    pub ccy_file: String,
    /// Spot-rate table.
    pub spot_file: String,
    /// Price table.
    pub price_file: String,
    /// Output file name under the sink directory.
    pub output_file: String,
    /// Inclusive output window.
    pub window: TimeWindow,
}

impl Default for RatesJob {
    fn default() -> Self {
        Self {
            ccy_file: "rates_ccy_data.csv".to_string(),
            spot_file: "rates_spot_rate_data.csv".to_string(),
            price_file: "rates_price_data.csv".to_string(),
            output_file: "converted_prices.csv".to_string(),
            window: TimeWindow::default(),
        }
    }
}

/// The rates conversion pipeline.
pub struct RatesPipeline {
    aligner: TemporalAligner,
}

impl RatesPipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            aligner: TemporalAligner::new(&config.align),
        }
    }

    /// Run the pipeline, returning the rows that were written.
    pub fn run(
        &self,
        source: &CsvSource,
        sink: &CsvSink,
        job: &RatesJob,
    ) -> Result<Vec<ConvertedRecord>> {
        let rules = source.load_rules(&job.ccy_file)?;
        let spots = source.load_spot_rates(&job.spot_file)?;
        let prices = source.load_prices(&job.price_file)?;
        info!(
            prices = prices.len(),
            spots = spots.len(),
            rules = rules.len(),
            "loaded rates inputs"
        );

        let merger = RuleMerger::new(rules)?;
        let aligned = self.aligner.align(&prices, &spots);
        let matched = aligned.iter().filter(|r| r.has_spot()).count();
        let merged = merger.merge(aligned);
        let converted = convert_records(merged);

        let filtered = job.window.filter(converted, |row| row.timestamp);
        info!(
            rows = filtered.len(),
            matched, "rates pipeline finished"
        );

        let path = sink.write_converted(&job.output_file, &filtered)?;
        info!(path = %path.display(), "wrote converted prices");
        Ok(filtered)
    }
}

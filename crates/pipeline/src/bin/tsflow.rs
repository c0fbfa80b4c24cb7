//! CLI entry point for the tsflow pipelines.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tsflow_core::Config;
use tsflow_pipeline::{
    CsvSink, CsvSource, RatesJob, RatesPipeline, StdevJob, StdevPipeline, TimeWindow,
};

#[derive(Parser)]
#[command(name = "tsflow", about = "Time-series alignment and rolling statistics pipelines")]
struct Cli {
    /// Directory holding the input tables
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory for pipeline outputs
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,

    /// Optional JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert quoted prices using as-of spot rates
    Rates(RatesArgs),
    /// Compute per-security rolling standard deviations
    Stdev(StdevArgs),
}

#[derive(Args)]
struct RatesArgs {
    /// Currency conversion rule file (CSV)
    #[arg(long, default_value = "rates_ccy_data.csv")]
    ccy: String,

    /// Spot rate file (CSV)
    #[arg(long, default_value = "rates_spot_rate_data.csv")]
    spot: String,

    /// Price file (CSV)
    #[arg(long, default_value = "rates_price_data.csv")]
    price: String,

    /// Output CSV file name (under the output directory)
    #[arg(long, default_value = "converted_prices.csv")]
    output: String,

    /// Optional inclusive start datetime (YYYY-MM-DD HH:MM:SS)
    #[arg(long)]
    start: Option<String>,

    /// Optional inclusive end datetime (YYYY-MM-DD HH:MM:SS)
    #[arg(long)]
    end: Option<String>,
}

#[derive(Args)]
struct StdevArgs {
    /// Input snapshot file name (under the data directory)
    #[arg(long, default_value = "stdev_price_data.csv")]
    input: String,

    /// Output CSV file name (under the output directory)
    #[arg(long, default_value = "rolling_stdev.csv")]
    output: String,

    /// Inclusive start datetime (YYYY-MM-DD HH:MM:SS)
    #[arg(long, default_value = "2021-11-20 00:00:00")]
    start: String,

    /// Inclusive end datetime (YYYY-MM-DD HH:MM:SS)
    #[arg(long, default_value = "2021-11-23 09:00:00")]
    end: String,

    /// Include diagnostic flag for gap-blocked windows
    #[arg(long)]
    add_gap_flag: bool,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => {
            let raw = std::fs::read_to_string(p)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(Config::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    let source = CsvSource::new(&cli.data_dir);
    let sink = CsvSink::new(&cli.output_dir);

    match cli.command {
        Commands::Rates(args) => {
            let job = RatesJob {
                ccy_file: args.ccy,
                spot_file: args.spot,
                price_file: args.price,
                output_file: args.output,
                window: TimeWindow::parse(args.start.as_deref(), args.end.as_deref())?,
            };
            RatesPipeline::new(&config).run(&source, &sink, &job)?;
        }
        Commands::Stdev(args) => {
            config.rolling.add_gap_flag |= args.add_gap_flag;
            let job = StdevJob {
                input_file: args.input,
                output_file: args.output,
                window: TimeWindow::parse(Some(&args.start), Some(&args.end))?,
            };
            StdevPipeline::new(&config).run(&source, &sink, &job)?;
        }
    }

    Ok(())
}

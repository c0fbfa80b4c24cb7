//! CSV table loader collaborator.
//!
//! Produces typed in-memory tables from files under a data directory. The
//! timestamp column of each table deserializes leniently: malformed values
//! become null rather than failing the batch. A missing file, by contrast,
//! fails before any computation begins.

use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::PathBuf;
use tsflow_core::{
    ConversionRule, Error, PriceRecord, Result, SecuritySnapshot, SpotRateRecord,
};

/// Loads typed tables from CSV files under a fixed data directory.
pub struct CsvSource {
    data_dir: PathBuf,
}

impl CsvSource {
    /// Create a source rooted at the given directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn read_table<T: DeserializeOwned>(&self, filename: &str) -> Result<Vec<T>> {
        let path = self.data_dir.join(filename);
        if !path.exists() {
            return Err(Error::not_found(path.display().to_string()));
        }

        let file = File::open(&path)?;
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let row: T = record.map_err(|e| Error::csv(format!("{filename}: {e}")))?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Load the price table.
    pub fn load_prices(&self, filename: &str) -> Result<Vec<PriceRecord>> {
        self.read_table(filename)
    }

    /// Load the spot-rate table.
    pub fn load_spot_rates(&self, filename: &str) -> Result<Vec<SpotRateRecord>> {
        self.read_table(filename)
    }

    /// Load the conversion-rule table.
    pub fn load_rules(&self, filename: &str) -> Result<Vec<ConversionRule>> {
        self.read_table(filename)
    }

    /// Load the security snapshot table.
    pub fn load_snapshots(&self, filename: &str) -> Result<Vec<SecuritySnapshot>> {
        self.read_table(filename)
    }
}

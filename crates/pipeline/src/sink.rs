//! CSV table writer collaborator.

use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tsflow_core::{ConvertedRecord, Error, Result, RollingResult};

/// Writes result tables as CSV files under a fixed output directory.
pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    /// Create a sink rooted at the given directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Path a given output file will be written to.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }

    fn write_table<T: Serialize>(&self, filename: &str, rows: &[T]) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(filename);

        let mut writer = csv::Writer::from_path(&path)
            .map_err(|e| Error::csv(format!("{}: {e}", path.display())))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| Error::csv(format!("{filename}: {e}")))?;
        }
        writer.flush()?;
        Ok(path)
    }

    /// Write the converted-price table.
    pub fn write_converted(&self, filename: &str, rows: &[ConvertedRecord]) -> Result<PathBuf> {
        self.write_table(filename, rows)
    }

    /// Write the rolling-stdev table.
    pub fn write_rolling(&self, filename: &str, rows: &[RollingResult]) -> Result<PathBuf> {
        self.write_table(filename, rows)
    }
}

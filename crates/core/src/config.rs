//! Configuration structures for the tsflow pipelines.
//!
//! Everything the core needs is carried here explicitly; nothing is derived
//! from the process environment or the binary's location.

use serde::{Deserialize, Serialize};

/// Main configuration for both pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Temporal alignment configuration (rates pipeline).
    pub align: AlignConfig,
    /// Rolling statistics configuration (stdev pipeline).
    pub rolling: RollingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            align: AlignConfig::default(),
            rolling: RollingConfig::default(),
        }
    }
}

/// Configuration for the as-of alignment of prices to spot rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Maximum spot staleness in seconds. A spot older than this relative to
    /// the price it would match is treated as no match.
    pub tolerance_secs: i64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: 3600,
        }
    }
}

/// Configuration for the per-security rolling statistics engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingConfig {
    /// Rolling window size in rows. All rows must be present for a result.
    pub window: usize,
    /// Required spacing between consecutive snapshots, in seconds.
    pub step_secs: i64,
    /// Emit the `gap_blocked` diagnostic column.
    pub add_gap_flag: bool,
    /// Number of parallel workers for group processing (0 = auto).
    pub workers: u32,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            window: 20,
            step_secs: 3600,
            add_gap_flag: false,
            workers: 0,
        }
    }
}

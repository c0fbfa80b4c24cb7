//! Per-security rolling statistics engine.
//!
//! Combines the stdev calculators and the contiguity tracker into one scan
//! per security group, with group-level parallelism across securities.

use chrono::Duration;
use rayon::prelude::*;
use std::cmp::Ordering;
use tsflow_core::config::RollingConfig;
use tsflow_core::{Error, Result, RollingResult, SecuritySnapshot, Timestamp};

/// Rolling statistics engine.
///
/// Stateless between calls: every `compute` builds its accumulators fresh,
/// so repeated runs over the same input produce identical output.
pub struct RollingEngine {
    config: RollingConfig,
}

/// Null timestamps sort last, mirroring the loader's treatment of
/// unparseable values.
fn by_snap_time(a: Option<Timestamp>, b: Option<Timestamp>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl RollingEngine {
    /// Create a new engine from configuration.
    pub fn new(config: &RollingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Compute rolling results for one security's rows, which must be
    /// sorted ascending by snap_time.
    ///
    /// One output row per input row; stdev fields are null wherever the
    /// window is short or not contiguous.
    pub fn compute_group(&self, rows: &[SecuritySnapshot]) -> Vec<RollingResult> {
        let window = self.config.window;
        let step = Duration::seconds(self.config.step_secs);

        let mut bid = crate::RollingStdev::new(window);
        let mut mid = crate::RollingStdev::new(window);
        let mut ask = crate::RollingStdev::new(window);
        let mut contiguity = crate::ContiguityTracker::new(window, step);

        rows.iter()
            .map(|snap| {
                let contiguous = contiguity.push(snap.snap_time);
                let bid_stdev = bid.push(snap.bid);
                let mid_stdev = mid.push(snap.mid);
                let ask_stdev = ask.push(snap.ask);

                let mut out = RollingResult::from_snapshot(snap);
                if contiguous {
                    out.bid_stdev = bid_stdev;
                    out.mid_stdev = mid_stdev;
                    out.ask_stdev = ask_stdev;
                }
                if self.config.add_gap_flag {
                    // Flags rows where the data was there but a gap masked it.
                    let available =
                        bid_stdev.is_some() || mid_stdev.is_some() || ask_stdev.is_some();
                    out.gap_blocked = Some(!contiguous && available);
                }
                out
            })
            .collect()
    }

    /// Compute rolling results for all securities.
    ///
    /// Rows are grouped by security_id and each group is sorted by snap_time
    /// and processed independently on the worker pool. Output is sorted by
    /// (security_id, snap_time) regardless of input or scheduling order.
    pub fn compute(&self, rows: &[SecuritySnapshot]) -> Result<Vec<RollingResult>> {
        let mut sorted: Vec<SecuritySnapshot> = rows.to_vec();
        sorted.sort_by(|a, b| {
            a.security_id
                .cmp(&b.security_id)
                .then_with(|| by_snap_time(a.snap_time, b.snap_time))
        });

        // Contiguous runs of the same security_id are the work units.
        let mut groups: Vec<&[SecuritySnapshot]> = Vec::new();
        let mut start = 0;
        for i in 1..=sorted.len() {
            if i == sorted.len() || sorted[i].security_id != sorted[start].security_id {
                groups.push(&sorted[start..i]);
                start = i;
            }
        }

        tracing::debug!(groups = groups.len(), rows = sorted.len(), "rolling compute");

        let run = || -> Vec<RollingResult> {
            let per_group: Vec<Vec<RollingResult>> = groups
                .par_iter()
                .map(|group| self.compute_group(group))
                .collect();
            per_group.into_iter().flatten().collect()
        };

        if self.config.workers > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.workers as usize)
                .build()
                .map_err(|e| Error::config(format!("worker pool: {e}")))?;
            Ok(pool.install(run))
        } else {
            Ok(run())
        }
    }
}
